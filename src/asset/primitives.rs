//! Built-in meshes: the textured unit box and a ground plane.

use glam::{Vec2, Vec3};

use super::walk::{compute_tangents, MeshData, Vertex};

/// (position, normal, uv) per vertex, four per face, counter-clockwise
/// from outside.
#[rustfmt::skip]
const BOX_VERTICES: [([f32; 3], [f32; 3], [f32; 2]); 24] = [
    // -Z
    ([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    ([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    ([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
    ([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
    // +Z
    ([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    ([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
    ([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    ([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
    // -X
    ([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    ([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    ([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    ([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
    // +X
    ([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    ([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    ([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    ([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    // -Y
    ([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    ([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
    ([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    ([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
    // +Y
    ([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
    ([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    ([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
];

#[rustfmt::skip]
const BOX_INDICES: [u32; 36] = [
     0,  1,  2,   3,  1,  0,
     4,  5,  6,   6,  7,  4,
     8,  9, 10,  10, 11,  8,
    12, 14, 13,  12, 15, 14,
    16, 17, 18,  18, 19, 16,
    20, 22, 21,  20, 23, 22,
];

impl MeshData {
    /// Axis-aligned unit cube centered at the origin, one UV square per face.
    #[must_use]
    pub fn unit_box() -> Self {
        let mut vertices: Vec<Vertex> = BOX_VERTICES
            .iter()
            .map(|&(p, n, uv)| {
                Vertex::new(Vec3::from(p), Vec3::from(n), Vec2::from(uv))
            })
            .collect();
        compute_tangents(&mut vertices, &BOX_INDICES);
        Self::new("box", vertices, BOX_INDICES.to_vec())
    }

    /// Square in the XZ plane facing +Y, spanning `±half_extent`, with UVs
    /// running from 0 to `uv_repeat` so repeat addressing tiles the texture.
    #[must_use]
    pub fn plane(half_extent: f32, uv_repeat: f32) -> Self {
        let h = half_extent;
        let r = uv_repeat;
        let corners = [
            (Vec3::new(-h, 0.0, -h), Vec2::new(0.0, 0.0)),
            (Vec3::new(h, 0.0, -h), Vec2::new(r, 0.0)),
            (Vec3::new(h, 0.0, h), Vec2::new(r, r)),
            (Vec3::new(-h, 0.0, h), Vec2::new(0.0, r)),
        ];
        let mut vertices: Vec<Vertex> = corners
            .iter()
            .map(|&(p, uv)| Vertex::new(p, Vec3::Y, uv))
            .collect();
        let indices = vec![0, 2, 1, 0, 3, 2];
        compute_tangents(&mut vertices, &indices);
        Self::new("plane", vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's geometric normal must agree with its vertex normals,
    /// so back-face culling with CCW front faces keeps the outside visible.
    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize]);
            let face = (Vec3::from(b.position) - Vec3::from(a.position))
                .cross(Vec3::from(c.position) - Vec3::from(a.position));
            assert!(
                face.dot(Vec3::from(a.normal)) > 0.0,
                "triangle {tri:?} winds inward"
            );
        }
    }

    #[test]
    fn unit_box_shape() {
        let mesh = MeshData::unit_box();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.bounds.center.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!((mesh.bounds.radius - 0.75_f32.sqrt()).abs() < 1e-5);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn box_tangents_are_unit_and_orthogonal_to_normals() {
        for v in MeshData::unit_box().vertices {
            let t = Vec3::from(v.tangent);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(t.dot(Vec3::from(v.normal)).abs() < 1e-5);
        }
    }

    #[test]
    fn plane_faces_up_and_tiles_uvs() {
        let mesh = MeshData::plane(5.0, 2.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_outward_winding(&mesh);
        let max_u = mesh
            .vertices
            .iter()
            .map(|v| v.tex_coord[0])
            .fold(0.0_f32, f32::max);
        assert_eq!(max_u, 2.0);
        assert!((mesh.bounds.radius - 50.0_f32.sqrt()).abs() < 1e-4);
    }
}
