//! CPU-side model data.
//!
//! An importer produces a [`SceneGraph`]; [`walk`] flattens it into
//! [`ModelData`] ready for upload by [`crate::mesh`]. Nothing in this module
//! needs a GPU device.

/// Wavefront OBJ/MTL import.
pub mod obj;
/// Built-in box and plane meshes.
pub mod primitives;
/// Scene graph types produced by importers.
pub mod scene;
/// Scene-graph flattening into vertex/index data.
pub mod walk;

pub use scene::{SceneGraph, SceneMaterial, SceneMesh, SceneNode, TextureKind};
pub use walk::{
    model_directory, walk, Bounds, MeshData, ModelData, TextureRef, Vertex,
};

use std::path::Path;

use crate::error::MeshviewError;

/// Import `path` and walk the result, resolving textures against the
/// model's directory.
///
/// # Errors
///
/// Returns [`MeshviewError::ModelLoad`] if import or the walk fails.
pub fn load_model_data(
    path: impl AsRef<Path>,
) -> Result<ModelData, MeshviewError> {
    let path = path.as_ref();
    let scene = obj::import(path)?;
    walk(&scene, model_directory(path))
}
