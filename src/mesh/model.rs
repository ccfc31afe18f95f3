use std::ops::Range;
use std::path::Path;

use glam::Mat4;

use super::gpu_mesh::GpuMesh;
use crate::asset::{load_model_data, Bounds, ModelData};
use crate::camera::Frustum;
use crate::error::MeshviewError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::TextureCache;

/// A loaded model: every mesh of one file, uploaded and ready to draw.
pub struct Model {
    /// Meshes in scene-graph walk order.
    pub meshes: Vec<GpuMesh>,
    bounds: Bounds,
}

impl Model {
    /// Import `path`, walk its scene graph and upload every mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::ModelLoad`] if the file can't be imported or
    /// its scene graph is malformed. Texture failures are not errors.
    pub fn load(
        context: &RenderContext,
        cache: &mut TextureCache,
        path: impl AsRef<Path>,
        material_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Result<Self, MeshviewError> {
        let path = path.as_ref();
        let data = load_model_data(path)?;
        let model =
            Self::from_data(context, cache, &data, material_layout, sampler)?;
        log::info!(
            "loaded {}: {} meshes, {} indices, {} textures cached",
            path.display(),
            model.mesh_count(),
            model.index_count(),
            cache.len()
        );
        Ok(model)
    }

    /// Upload already-walked model data.
    ///
    /// # Errors
    ///
    /// Propagates [`GpuMesh::upload`] failures.
    pub fn from_data(
        context: &RenderContext,
        cache: &mut TextureCache,
        data: &ModelData,
        material_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Result<Self, MeshviewError> {
        let meshes = data
            .meshes
            .iter()
            .map(|mesh| {
                GpuMesh::upload(context, cache, mesh, material_layout, sampler)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            meshes,
            bounds: data.bounds(),
        })
    }

    /// Number of meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total index count.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.meshes.iter().map(GpuMesh::index_count).sum()
    }

    /// Object-space bounds of the whole model.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Draw every mesh once.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for mesh in &self.meshes {
            mesh.draw(pass);
        }
    }

    /// Draw every mesh for each instance in `instances`.
    pub fn draw_instanced(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        instances: Range<u32>,
    ) {
        for mesh in &self.meshes {
            mesh.draw_instanced(pass, instances.clone());
        }
    }

    /// Draw once, skipping meshes whose bounds under `transform` fall
    /// outside `frustum`. Returns the number of meshes drawn.
    pub fn draw_culled(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        transform: &Mat4,
        frustum: &Frustum,
    ) -> usize {
        let mut drawn = 0;
        for mesh in &self.meshes {
            let bounds = mesh.bounds.transformed(transform);
            if frustum.intersects_sphere(bounds.center, bounds.radius) {
                mesh.draw(pass);
                drawn += 1;
            }
        }
        drawn
    }
}
