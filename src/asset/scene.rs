//! Imported scene graph: plain data handed over by an importer.
//!
//! Nothing here touches the GPU or the filesystem. Nodes reference meshes by
//! index and meshes reference materials by index, mirroring the layout
//! importers produce, so a malformed graph is representable and has to be
//! rejected by [`walk`](super::walk::walk).

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Role of a texture within a material.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    /// Base color map.
    Diffuse,
    /// Specular intensity map.
    Specular,
    /// Tangent-space normal map.
    Normal,
}

impl TextureKind {
    /// All kinds in binding order.
    pub const ALL: [Self; 3] = [Self::Diffuse, Self::Specular, Self::Normal];

    /// Prefix of the shader-side sampler name for this kind.
    #[must_use]
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
        }
    }

    /// Whether texels are color data and should be sampled as sRGB.
    #[must_use]
    pub fn is_color(self) -> bool {
        matches!(self, Self::Diffuse)
    }
}

/// A node of the imported hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    /// Node name as given by the importer (may be empty).
    pub name: String,
    /// Indices into [`SceneGraph::meshes`].
    pub mesh_indices: Vec<usize>,
    /// Child nodes, in import order.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Leaf node holding the given meshes.
    #[must_use]
    pub fn with_meshes(name: impl Into<String>, mesh_indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            mesh_indices,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// Raw vertex and face data of one imported mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMesh {
    /// Mesh name as given by the importer.
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals; empty when the source had none.
    pub normals: Vec<Vec3>,
    /// First texture-coordinate channel, if present.
    pub tex_coords: Option<Vec<Vec2>>,
    /// Faces as index lists into the vertex arrays.
    pub faces: Vec<Vec<u32>>,
    /// Index into [`SceneGraph::materials`].
    pub material_index: Option<usize>,
}

impl SceneMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Texture references of one imported material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMaterial {
    /// Material name.
    pub name: String,
    /// Texture paths as written in the source file, relative to the model
    /// directory, tagged by role. Order within a kind is preserved.
    pub textures: Vec<(TextureKind, String)>,
    /// Specular exponent, when the source provides one.
    pub shininess: Option<f32>,
}

impl SceneMaterial {
    /// Paths of all textures of `kind`, in source order.
    pub fn textures_of(
        &self,
        kind: TextureKind,
    ) -> impl Iterator<Item = &str> + '_ {
        self.textures
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, path)| path.as_str())
    }
}

/// A complete imported scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    /// Root of the node hierarchy.
    pub root: SceneNode,
    /// All meshes, referenced by index from nodes.
    pub meshes: Vec<SceneMesh>,
    /// All materials, referenced by index from meshes.
    pub materials: Vec<SceneMaterial>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_of_filters_and_keeps_order() {
        let material = SceneMaterial {
            name: "m".into(),
            textures: vec![
                (TextureKind::Specular, "s1.png".into()),
                (TextureKind::Diffuse, "d1.png".into()),
                (TextureKind::Diffuse, "d2.png".into()),
            ],
            shininess: None,
        };
        let diffuse: Vec<_> =
            material.textures_of(TextureKind::Diffuse).collect();
        assert_eq!(diffuse, ["d1.png", "d2.png"]);
        assert_eq!(material.textures_of(TextureKind::Normal).count(), 0);
    }

    #[test]
    fn node_count_includes_descendants() {
        let root = SceneNode {
            name: "root".into(),
            mesh_indices: vec![],
            children: vec![
                SceneNode::with_meshes("a", vec![0]),
                SceneNode {
                    name: "b".into(),
                    mesh_indices: vec![],
                    children: vec![SceneNode::with_meshes("c", vec![1])],
                },
            ],
        };
        assert_eq!(root.node_count(), 4);
    }
}
