//! Texture-slot naming convention.
//!
//! Shaders written against this convention declare their samplers as
//! `material.texture_diffuse1`, `material.texture_diffuse2`,
//! `material.texture_specular1`, ... The n-th texture of a mesh goes to
//! slot n; the number suffix counts from 1 separately for each kind.

use crate::asset::{TextureKind, TextureRef};

/// Specular exponent used when a material doesn't specify one.
pub const DEFAULT_SHININESS: f32 = 16.0;

/// Where one texture of a mesh is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSlot {
    /// Binding slot, equal to the texture's position in the mesh list.
    pub slot: u32,
    /// Texture role.
    pub kind: TextureKind,
    /// Shader-side name, e.g. `material.texture_specular1`.
    pub uniform_name: String,
}

/// Assign slots and uniform names to a mesh's textures, in order.
#[must_use]
pub fn texture_slots(textures: &[TextureRef]) -> Vec<TextureSlot> {
    let mut counters = [0_u32; TextureKind::ALL.len()];
    textures
        .iter()
        .zip(0..)
        .map(|(texture, slot)| {
            let counter = &mut counters[texture.kind as usize];
            *counter += 1;
            TextureSlot {
                slot,
                kind: texture.kind,
                uniform_name: format!(
                    "material.{}{}",
                    texture.kind.uniform_prefix(),
                    counter
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn tex(kind: TextureKind, path: &str) -> TextureRef {
        TextureRef {
            kind,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn numbering_is_per_kind_and_slots_are_positional() {
        let textures = [
            tex(TextureKind::Diffuse, "a.png"),
            tex(TextureKind::Diffuse, "b.png"),
            tex(TextureKind::Specular, "c.png"),
            tex(TextureKind::Normal, "d.png"),
            tex(TextureKind::Specular, "e.png"),
        ];
        let slots = texture_slots(&textures);
        let names: Vec<_> =
            slots.iter().map(|s| s.uniform_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "material.texture_diffuse1",
                "material.texture_diffuse2",
                "material.texture_specular1",
                "material.texture_normal1",
                "material.texture_specular2",
            ]
        );
        let numbers: Vec<_> = slots.iter().map(|s| s.slot).collect();
        assert_eq!(numbers, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn no_textures_no_slots() {
        assert!(texture_slots(&[]).is_empty());
    }
}
