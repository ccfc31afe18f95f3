//! Per-mesh material: texture bindings plus a small uniform block.
//!
//! Bind group 2 of the mesh pipelines:
//!
//! | binding | resource            |
//! |---------|---------------------|
//! | 0       | [`MaterialUniform`] |
//! | 1       | diffuse map         |
//! | 2       | specular map        |
//! | 3       | normal map          |
//! | 4       | sampler             |

use wgpu::util::DeviceExt;

use super::slots::{texture_slots, TextureSlot};
use crate::asset::{MeshData, TextureKind};
use crate::error::MeshviewError;
use crate::gpu::pipeline;
use crate::gpu::render_context::RenderContext;
use crate::gpu::TextureCache;

/// Material constants read by the fragment shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Specular exponent.
    pub shininess: f32,
    /// Nonzero when a real diffuse map is bound.
    pub has_diffuse: u32,
    /// Nonzero when a real specular map is bound.
    pub has_specular: u32,
    /// Nonzero when a real normal map is bound (enables normal mapping).
    pub has_normal: u32,
}

impl MaterialUniform {
    /// Uniform for `mesh`, given which of its maps actually loaded.
    #[must_use]
    pub fn new(mesh: &MeshData, loaded: [bool; TextureKind::ALL.len()]) -> Self {
        Self {
            shininess: mesh.shininess,
            has_diffuse: u32::from(loaded[TextureKind::Diffuse as usize]),
            has_specular: u32::from(loaded[TextureKind::Specular as usize]),
            has_normal: u32::from(loaded[TextureKind::Normal as usize]),
        }
    }
}

/// Binding of the texture of `kind` in the material group.
#[must_use]
pub fn texture_binding(kind: TextureKind) -> u32 {
    kind as u32 + 1
}

/// Bind group layout shared by every material.
#[must_use]
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            pipeline::uniform_buffer(0, wgpu::ShaderStages::FRAGMENT),
            pipeline::texture_2d(texture_binding(TextureKind::Diffuse)),
            pipeline::texture_2d(texture_binding(TextureKind::Specular)),
            pipeline::texture_2d(texture_binding(TextureKind::Normal)),
            pipeline::filtering_sampler(4),
        ],
    })
}

/// The first slot of `kind`: the one the fixed material layout binds.
fn primary_slot(slots: &[TextureSlot], kind: TextureKind) -> Option<&TextureSlot> {
    slots.iter().find(|slot| slot.kind == kind)
}

/// GPU resources of one mesh's material.
pub struct Material {
    /// CPU copy of the uniform.
    pub uniform: MaterialUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group (group 2).
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    /// Load `mesh`'s textures through `cache` and build its bind group.
    ///
    /// A texture that fails to load is logged and replaced by the fallback
    /// of its kind; the mesh still draws.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::ModelLoad`] if no view, not even a fallback,
    /// exists for some kind.
    pub fn new(
        context: &RenderContext,
        cache: &mut TextureCache,
        mesh: &MeshData,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Result<Self, MeshviewError> {
        cache.ensure_fallbacks(&context.device, &context.queue);

        let slots = texture_slots(&mesh.textures);
        for slot in &slots {
            log::debug!(
                "mesh '{}': {} -> slot {}",
                mesh.name,
                slot.uniform_name,
                slot.slot
            );
        }
        if slots.len() > TextureKind::ALL.len() {
            log::debug!(
                "mesh '{}' has {} textures; only the first of each kind is \
                 bound",
                mesh.name,
                slots.len()
            );
        }

        let mut loaded = [false; TextureKind::ALL.len()];
        for kind in TextureKind::ALL {
            let Some(slot) = primary_slot(&slots, kind) else {
                continue;
            };
            let texture = &mesh.textures[slot.slot as usize];
            match cache.load(&context.device, &context.queue, texture) {
                Ok(_) => loaded[kind as usize] = true,
                Err(e) => log::warn!("{e}; using fallback"),
            }
        }

        let mut views = Vec::with_capacity(TextureKind::ALL.len());
        for kind in TextureKind::ALL {
            let view = primary_slot(&slots, kind)
                .filter(|_| loaded[kind as usize])
                .and_then(|slot| {
                    let texture = &mesh.textures[slot.slot as usize];
                    cache.get(&texture.path, texture.kind.is_color())
                })
                .or_else(|| cache.fallback(kind))
                .map(|texture| &texture.view)
                .ok_or_else(|| {
                    MeshviewError::ModelLoad(format!(
                        "no {kind:?} texture for mesh '{}'",
                        mesh.name
                    ))
                })?;
            views.push(view);
        }

        let uniform = MaterialUniform::new(mesh, loaded);
        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Material Buffer"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }];
        for (kind, view) in TextureKind::ALL.into_iter().zip(views) {
            entries.push(wgpu::BindGroupEntry {
                binding: texture_binding(kind),
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        entries.push(wgpu::BindGroupEntry {
            binding: 4,
            resource: wgpu::BindingResource::Sampler(sampler),
        });

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Material {}", mesh.name)),
                layout,
                entries: &entries,
            });

        Ok(Self {
            uniform,
            buffer,
            bind_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::asset::{TextureRef, Vertex};

    #[test]
    fn uniform_is_sixteen_bytes() {
        assert_eq!(size_of::<MaterialUniform>(), 16);
    }

    #[test]
    fn bindings_follow_kind_order() {
        assert_eq!(texture_binding(TextureKind::Diffuse), 1);
        assert_eq!(texture_binding(TextureKind::Specular), 2);
        assert_eq!(texture_binding(TextureKind::Normal), 3);
    }

    #[test]
    fn uniform_flags_reflect_loaded_maps() {
        let mesh = MeshData {
            shininess: 64.0,
            ..MeshData::new("m", vec![Vertex::default(); 3], vec![0, 1, 2])
        };
        let uniform = MaterialUniform::new(&mesh, [true, false, true]);
        assert_eq!(uniform.shininess, 64.0);
        assert_eq!(uniform.has_diffuse, 1);
        assert_eq!(uniform.has_specular, 0);
        assert_eq!(uniform.has_normal, 1);
    }

    #[test]
    fn primary_slot_is_first_of_kind() {
        let textures = [
            TextureRef {
                kind: TextureKind::Diffuse,
                path: PathBuf::from("a.png"),
            },
            TextureRef {
                kind: TextureKind::Diffuse,
                path: PathBuf::from("b.png"),
            },
        ];
        let slots = texture_slots(&textures);
        assert_eq!(
            primary_slot(&slots, TextureKind::Diffuse).map(|s| s.slot),
            Some(0)
        );
        assert!(primary_slot(&slots, TextureKind::Normal).is_none());
    }
}
