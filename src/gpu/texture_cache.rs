//! Path-keyed texture deduplication.
//!
//! Every texture is decoded and uploaded at most once per cache, no matter
//! how many meshes or models reference it. The cache key is the resolved
//! path exactly as produced by the scene-graph walk, plus the color space:
//! a file used both as a diffuse map (sRGB) and as a specular or normal map
//! (linear) is uploaded once per color space.

use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::texture::GpuTexture;
use crate::asset::{TextureKind, TextureRef};
use crate::error::MeshviewError;

/// Texel value bound where a mesh lacks a map of the given kind.
#[must_use]
pub fn fallback_color(kind: TextureKind) -> [u8; 4] {
    match kind {
        TextureKind::Diffuse => [255, 255, 255, 255],
        TextureKind::Specular => [128, 128, 128, 255],
        // Tangent-space +Z.
        TextureKind::Normal => [128, 128, 255, 255],
    }
}

/// Cache key: resolved path and whether texels are decoded as sRGB.
type TextureKey = (PathBuf, bool);

/// Deduplicating store of loaded textures plus per-kind fallbacks.
pub struct TextureCache<T = GpuTexture> {
    entries: FxHashMap<TextureKey, T>,
    fallbacks: FxHashMap<TextureKind, T>,
    hits: usize,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            fallbacks: FxHashMap::default(),
            hits: 0,
        }
    }
}

impl<T> TextureCache<T> {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct loaded textures (fallbacks excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no texture has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered without loading.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Whether `path` is already loaded in the given color space.
    #[must_use]
    pub fn contains(&self, path: &Path, srgb: bool) -> bool {
        self.entries.contains_key(&(path.to_path_buf(), srgb))
    }

    /// The texture loaded for `path` in the given color space, if any.
    #[must_use]
    pub fn get(&self, path: &Path, srgb: bool) -> Option<&T> {
        self.entries.get(&(path.to_path_buf(), srgb))
    }

    /// The fallback for `kind`, if created.
    #[must_use]
    pub fn fallback(&self, kind: TextureKind) -> Option<&T> {
        self.fallbacks.get(&kind)
    }

    /// Return the entry for `path` in the given color space, running `load`
    /// only on first request. A failed load leaves the cache unchanged so a
    /// later call retries.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `load`.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        path: &Path,
        srgb: bool,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        match self.entries.entry((path.to_path_buf(), srgb)) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(load()?)),
        }
    }

    /// Return the fallback for `kind`, creating it on first request.
    pub fn fallback_or_insert_with(
        &mut self,
        kind: TextureKind,
        make: impl FnOnce() -> T,
    ) -> &T {
        self.fallbacks.entry(kind).or_insert_with(make)
    }

    /// Drop every loaded texture, keeping fallbacks.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}

impl TextureCache<GpuTexture> {
    /// Load (or reuse) the texture behind `texture`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::TextureLoad`] if the image can't be decoded.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &TextureRef,
    ) -> Result<&GpuTexture, MeshviewError> {
        self.get_or_try_insert_with(&texture.path, texture.kind.is_color(), || {
            GpuTexture::load(device, queue, &texture.path, texture.kind)
        })
    }

    /// Create the 1×1 fallback of every kind that doesn't exist yet.
    pub fn ensure_fallbacks(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        for kind in TextureKind::ALL {
            let _ = self.fallback_or_insert_with(kind, || {
                GpuTexture::solid(
                    device,
                    queue,
                    fallback_color(kind),
                    kind.is_color(),
                    &format!("Fallback {kind:?}"),
                )
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_reuses_first_load() {
        let mut cache: TextureCache<String> = TextureCache::new();
        let mut loads = 0;
        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with(Path::new("a/diffuse.png"), true, || {
                    loads += 1;
                    Ok::<_, ()>("diffuse".to_owned())
                })
                .unwrap();
            assert_eq!(value, "diffuse");
        }
        assert_eq!(loads, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 2);
    }

    #[test]
    fn keys_compare_by_exact_path() {
        let mut cache: TextureCache<u32> = TextureCache::new();
        let _ = cache.get_or_try_insert_with(Path::new("a/t.png"), true, || {
            Ok::<_, ()>(1)
        });
        let _ = cache.get_or_try_insert_with(Path::new("b/t.png"), true, || {
            Ok::<_, ()>(2)
        });
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(Path::new("b/t.png"), true), Some(&2));
    }

    #[test]
    fn color_space_is_part_of_the_key() {
        let mut cache: TextureCache<&str> = TextureCache::new();
        let path = Path::new("shared.png");
        let diffuse = TextureKind::Diffuse.is_color();
        let specular = TextureKind::Specular.is_color();
        let _ = cache.get_or_try_insert_with(path, diffuse, || Ok::<_, ()>("srgb"));
        let _ = cache.get_or_try_insert_with(path, specular, || Ok::<_, ()>("linear"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.get(path, diffuse), Some(&"srgb"));
        assert_eq!(cache.get(path, specular), Some(&"linear"));
        assert_eq!(
            cache.get_or_try_insert_with(path, specular, || Ok::<_, ()>("again")),
            Ok(&"linear")
        );
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache: TextureCache<u32> = TextureCache::new();
        let path = Path::new("missing.png");
        assert!(cache.get_or_try_insert_with(path, false, || Err("nope")).is_err());
        assert!(!cache.contains(path, false));
        assert_eq!(
            cache.get_or_try_insert_with(path, false, || Ok::<_, &str>(7)),
            Ok(&7)
        );
    }

    #[test]
    fn fallbacks_are_created_once_and_survive_clear() {
        let mut cache: TextureCache<&str> = TextureCache::new();
        let _ = cache.fallback_or_insert_with(TextureKind::Normal, || "flat");
        let _ = cache.fallback_or_insert_with(TextureKind::Normal, || "other");
        let _ = cache.get_or_try_insert_with(Path::new("x.png"), true, || {
            Ok::<_, ()>("x")
        });
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.fallback(TextureKind::Normal), Some(&"flat"));
    }

    #[test]
    fn normal_fallback_points_along_z() {
        assert_eq!(fallback_color(TextureKind::Normal), [128, 128, 255, 255]);
    }
}
