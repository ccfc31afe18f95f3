//! Scene-graph walk: flattens an imported [`SceneGraph`] into GPU-ready
//! mesh data.
//!
//! The walk is pure. It produces interleaved vertices, `u32` indices,
//! resolved texture references and bounding spheres; uploading them is the
//! job of [`crate::mesh`].

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec2, Vec3};

use super::scene::{SceneGraph, SceneMesh, SceneNode, TextureKind};
use crate::error::MeshviewError;
use crate::mesh::slots::DEFAULT_SHININESS;

/// Interleaved vertex consumed by the mesh pipelines.
///
/// Shader locations: 0 position, 1 normal, 2 tex_coord, 3 tangent,
/// 4 bitangent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal (zero when the source had none).
    pub normal: [f32; 3],
    /// First texture-coordinate channel.
    pub tex_coord: [f32; 2],
    /// Tangent along increasing U.
    pub tangent: [f32; 3],
    /// Bitangent along increasing V.
    pub bitangent: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x3,
        4 => Float32x3,
    ];

    /// Vertex with position, normal and UV; tangent frame left at zero.
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
            ..Self::default()
        }
    }

    /// Per-vertex buffer layout (slot 0).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A texture a mesh samples, with its path resolved against the model
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// Role within the material.
    pub kind: TextureKind,
    /// Path on disk. Also the dedup key of the texture cache.
    pub path: PathBuf,
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius (zero for empty meshes).
    pub radius: f32,
}

impl Bounds {
    /// Sphere around the midpoint of the axis-aligned box of `points`.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3> + Clone) -> Self {
        let mut iter = points.clone().into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (min, max) =
            iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let center = (min + max) * 0.5;
        let radius = points
            .into_iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        Self { center, radius }
    }

    /// Conservative bounds after applying `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let (scale, _, _) = transform.to_scale_rotation_translation();
        Self {
            center: transform.transform_point3(self.center),
            radius: self.radius * scale.abs().max_element(),
        }
    }
}

/// One flattened, draw-ready mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Source mesh name.
    pub name: String,
    /// Interleaved vertices.
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Textures: all diffuse, then all specular, then all normal maps.
    pub textures: Vec<TextureRef>,
    /// Specular exponent.
    pub shininess: f32,
    /// Bounding sphere in object space.
    pub bounds: Bounds,
}

impl MeshData {
    /// Build mesh data from vertices and indices, computing bounds.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Self {
        let bounds =
            Bounds::from_points(vertices.iter().map(|v| Vec3::from(v.position)));
        Self {
            name: name.into(),
            vertices,
            indices,
            textures: Vec::new(),
            shininess: DEFAULT_SHININESS,
            bounds,
        }
    }

    /// Attach texture references.
    #[must_use]
    pub fn with_textures(mut self, textures: Vec<TextureRef>) -> Self {
        self.textures = textures;
        self
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// First texture of `kind`, if any.
    #[must_use]
    pub fn first_texture(&self, kind: TextureKind) -> Option<&TextureRef> {
        self.textures.iter().find(|t| t.kind == kind)
    }
}

/// Everything a model needs before GPU upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    /// Directory texture paths were resolved against.
    pub directory: PathBuf,
    /// Meshes in walk order.
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Bounds enclosing every mesh.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let spheres = self.meshes.iter().map(|m| m.bounds);
        let Some(first) = spheres.clone().next() else {
            return Bounds::default();
        };
        spheres.skip(1).fold(first, |acc, b| {
            let offset = b.center - acc.center;
            let distance = offset.length();
            if distance + b.radius <= acc.radius {
                acc
            } else if distance + acc.radius <= b.radius {
                b
            } else {
                let radius = (distance + acc.radius + b.radius) * 0.5;
                let center =
                    acc.center + offset * ((radius - acc.radius) / distance);
                Bounds { center, radius }
            }
        })
    }

    /// Total index count over all meshes.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len()).sum()
    }
}

/// Directory part of a model path: everything before the last separator,
/// or `.` when there is none.
#[must_use]
pub fn model_directory(path: impl AsRef<Path>) -> PathBuf {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Flatten `scene` depth-first: each node's own meshes in order, then its
/// children in order.
///
/// # Errors
///
/// Returns [`MeshviewError::ModelLoad`] when a node references a missing
/// mesh, a mesh references a missing material, or a face references a
/// missing vertex.
pub fn walk(
    scene: &SceneGraph,
    directory: impl AsRef<Path>,
) -> Result<ModelData, MeshviewError> {
    let directory = directory.as_ref();
    let mut meshes = Vec::with_capacity(scene.meshes.len());
    walk_node(&scene.root, scene, directory, &mut meshes)?;
    Ok(ModelData {
        directory: directory.to_path_buf(),
        meshes,
    })
}

fn walk_node(
    node: &SceneNode,
    scene: &SceneGraph,
    directory: &Path,
    out: &mut Vec<MeshData>,
) -> Result<(), MeshviewError> {
    for &index in &node.mesh_indices {
        let mesh = scene.meshes.get(index).ok_or_else(|| {
            MeshviewError::ModelLoad(format!(
                "node '{}' references mesh {index} but the scene has {}",
                node.name,
                scene.meshes.len()
            ))
        })?;
        out.push(process_mesh(mesh, scene, directory)?);
    }
    for child in &node.children {
        walk_node(child, scene, directory, out)?;
    }
    Ok(())
}

fn process_mesh(
    mesh: &SceneMesh,
    scene: &SceneGraph,
    directory: &Path,
) -> Result<MeshData, MeshviewError> {
    let vertex_count = mesh.vertex_count();

    if mesh.normals.is_empty() && vertex_count > 0 {
        log::warn!("mesh '{}' has no normals; lighting will be flat", mesh.name);
    }
    let mut vertices: Vec<Vertex> = (0..vertex_count)
        .map(|i| {
            let normal = mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO);
            let tex_coord = mesh
                .tex_coords
                .as_ref()
                .and_then(|uvs| uvs.get(i).copied())
                .unwrap_or(Vec2::ZERO);
            Vertex::new(mesh.positions[i], normal, tex_coord)
        })
        .collect();

    let indices = triangulate(mesh)?;

    if mesh.tex_coords.is_some() {
        compute_tangents(&mut vertices, &indices);
    }

    let mut data = MeshData::new(mesh.name.clone(), vertices, indices);

    if let Some(material_index) = mesh.material_index {
        let material = scene.materials.get(material_index).ok_or_else(|| {
            MeshviewError::ModelLoad(format!(
                "mesh '{}' references material {material_index} but the \
                 scene has {}",
                mesh.name,
                scene.materials.len()
            ))
        })?;
        data.textures = TextureKind::ALL
            .into_iter()
            .flat_map(|kind| {
                material.textures_of(kind).map(move |path| TextureRef {
                    kind,
                    path: directory.join(path),
                })
            })
            .collect();
        if let Some(shininess) = material.shininess.filter(|s| *s > 0.0) {
            data.shininess = shininess;
        }
    }

    Ok(data)
}

/// Concatenate face indices as a triangle list. Triangles pass through in
/// order; larger polygons are fanned; points and lines are dropped.
fn triangulate(mesh: &SceneMesh) -> Result<Vec<u32>, MeshviewError> {
    let vertex_count = mesh.vertex_count();
    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        if let Some(&bad) =
            face.iter().find(|&&i| i as usize >= vertex_count)
        {
            return Err(MeshviewError::ModelLoad(format!(
                "mesh '{}' face references vertex {bad} but it has \
                 {vertex_count}",
                mesh.name
            )));
        }
        match face.as_slice() {
            [] | [_] | [_, _] => {}
            [a, rest @ ..] => {
                for pair in rest.windows(2) {
                    indices.extend_from_slice(&[*a, pair[0], pair[1]]);
                }
            }
        }
    }
    Ok(indices)
}

/// Accumulate per-triangle tangent frames from UV derivatives, then
/// normalize. Degenerate UV triangles contribute nothing.
pub(crate) fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![Vec3::ZERO; vertices.len()];
    let mut bitangents = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let edge1 = Vec3::from(v1.position) - Vec3::from(v0.position);
        let edge2 = Vec3::from(v2.position) - Vec3::from(v0.position);
        let duv1 = Vec2::from(v1.tex_coord) - Vec2::from(v0.tex_coord);
        let duv2 = Vec2::from(v2.tex_coord) - Vec2::from(v0.tex_coord);

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let f = det.recip();
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * f;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * f;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    for ((vertex, t), b) in vertices.iter_mut().zip(tangents).zip(bitangents) {
        vertex.tangent = t.normalize_or_zero().to_array();
        vertex.bitangent = b.normalize_or_zero().to_array();
    }
}
