//! GPU-resident meshes and models.
//!
//! [`Model::load`] imports a file, walks its scene graph and uploads each
//! mesh with its material. Textures go through a shared
//! [`TextureCache`](crate::gpu::TextureCache) so each image is uploaded once.

/// Vertex/index buffers and draw calls for one mesh.
pub mod gpu_mesh;
/// Material uniform and texture bind group.
pub mod material;
/// A loaded model.
pub mod model;
/// Texture-slot naming convention.
pub mod slots;

pub use gpu_mesh::GpuMesh;
pub use material::{material_layout, Material, MaterialUniform};
pub use model::Model;
pub use slots::{texture_slots, TextureSlot, DEFAULT_SHININESS};
