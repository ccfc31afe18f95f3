use std::ops::Range;

use wgpu::util::DeviceExt;

use super::material::Material;
use crate::asset::{Bounds, MeshData};
use crate::error::MeshviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::TextureCache;

/// Bind group index of the material in the mesh pipelines.
pub const MATERIAL_GROUP: u32 = 2;

/// One mesh resident on the GPU: vertex and index buffers plus its
/// material. Immutable after upload.
pub struct GpuMesh {
    /// Source mesh name.
    pub name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// Material bind group and uniform.
    pub material: Material,
    /// Object-space bounding sphere.
    pub bounds: Bounds,
}

impl GpuMesh {
    /// Upload `mesh`, loading its textures through `cache`.
    ///
    /// # Errors
    ///
    /// Propagates [`Material::new`] failures.
    pub fn upload(
        context: &RenderContext,
        cache: &mut TextureCache,
        mesh: &MeshData,
        material_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Result<Self, MeshviewError> {
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertices", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Indices", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        let material =
            Material::new(context, cache, mesh, material_layout, sampler)?;

        log::debug!(
            "uploaded mesh '{}': {} vertices, {} triangles",
            mesh.name,
            mesh.vertices.len(),
            mesh.triangle_count()
        );

        Ok(Self {
            name: mesh.name.clone(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material,
            bounds: mesh.bounds,
        })
    }

    /// Number of indices drawn.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Draw one instance (instance index 0 of the bound instance buffer).
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.draw_instanced(pass, 0..1);
    }

    /// Draw `instances` of the instance buffer bound at slot 1. Empty
    /// meshes and empty ranges draw nothing.
    pub fn draw_instanced(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        instances: Range<u32>,
    ) {
        if self.index_count == 0 || instances.is_empty() {
            return;
        }
        pass.set_bind_group(MATERIAL_GROUP, &self.material.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.index_count, 0, instances);
    }
}
