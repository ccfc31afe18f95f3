//! Sampled material textures and the depth attachment.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use crate::asset::TextureKind;
use crate::error::MeshviewError;

/// Depth attachment format used by every mesh pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Number of mip levels of a full chain down to 1×1.
#[must_use]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Full CPU-side mip chain: level 0 is `image` itself, each following level
/// halves both dimensions (never below 1) with a triangle filter.
#[must_use]
pub fn mip_chain(image: RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(image.width(), image.height()) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(image);
    while chain.len() < levels {
        let Some(previous) = chain.last() else { break };
        let width = (previous.width() / 2).max(1);
        let height = (previous.height() / 2).max(1);
        let next =
            image::imageops::resize(previous, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// A sampled 2D texture with a full mip chain.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Level-0 size in texels.
    pub size: (u32, u32),
}

impl GpuTexture {
    /// Upload `image` with all mip levels. Color data (`srgb`) is stored as
    /// `Rgba8UnormSrgb`, everything else as linear `Rgba8Unorm`.
    #[must_use]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: RgbaImage,
        srgb: bool,
        label: &str,
    ) -> Self {
        let size = image.dimensions();
        let chain = mip_chain(image);
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: chain.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in (0_u32..).zip(&chain) {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                mip.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * mip.width()),
                    rows_per_image: Some(mip.height()),
                },
                wgpu::Extent3d {
                    width: mip.width(),
                    height: mip.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size,
        }
    }

    /// Decode the image at `path` and upload it for use as `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::TextureLoad`] if the file can't be read or
    /// decoded.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        kind: TextureKind,
    ) -> Result<Self, MeshviewError> {
        let image = image::open(path)
            .map_err(|source| MeshviewError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        log::info!(
            "Loaded {kind:?} texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(
            device,
            queue,
            image,
            kind.is_color(),
            &path.to_string_lossy(),
        ))
    }

    /// 1×1 texture of a single color, bound where a mesh has no map.
    #[must_use]
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        srgb: bool,
        label: &str,
    ) -> Self {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_image(device, queue, image, srgb, label)
    }
}

/// Repeat-addressed, trilinear sampler shared by all material textures.
#[must_use]
pub fn material_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Material Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Depth attachment matching the surface size.
pub struct DepthTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Create a depth texture of the given size (clamped to at least 1×1).
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_count_covers_largest_dimension() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(512, 512), 10);
        assert_eq!(mip_level_count(640, 480), 10);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn chain_halves_down_to_one_texel() {
        let chain = mip_chain(RgbaImage::new(8, 2));
        let sizes: Vec<_> = chain.iter().map(RgbaImage::dimensions).collect();
        assert_eq!(sizes, [(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn chain_preserves_flat_color() {
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
        let chain = mip_chain(image);
        let last = chain.last().unwrap();
        assert_eq!(last.get_pixel(0, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let path = Path::new("no/such/texture.png");
        let err = image::open(path)
            .map_err(|source| MeshviewError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })
            .err()
            .unwrap();
        assert!(err.to_string().contains("texture.png"));
    }
}
