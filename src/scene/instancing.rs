//! Per-instance transforms and the procedural asteroid ring.

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::asset::Bounds;
use crate::camera::Frustum;

/// Axis every ring instance is rotated about.
pub const RING_ROTATION_AXIS: Vec3 = Vec3::new(0.4, 0.6, 0.8);

/// Vertical displacement is squashed by this factor so the ring stays flat.
pub const RING_VERTICAL_SCALE: f32 = 0.4;

/// Smallest instance scale (inclusive).
pub const MIN_INSTANCE_SCALE: f32 = 0.05;

/// Largest instance scale (exclusive).
pub const MAX_INSTANCE_SCALE: f32 = 0.25;

/// Per-instance vertex data (slot 1).
///
/// Shader locations: 5–8 model matrix columns, 9–11 normal matrix columns.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Model matrix, column-major.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix's upper 3×3.
    pub normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x3,
        10 => Float32x3,
        11 => Float32x3,
    ];

    /// Instance data for `transform`.
    #[must_use]
    pub fn from_transform(transform: &Mat4) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            normal: normal_matrix(transform).to_cols_array_2d(),
        }
    }

    /// Per-instance buffer layout (slot 1).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::from_transform(&Mat4::IDENTITY)
    }
}

/// Matrix that carries normals through `transform`. Singular transforms
/// fall back to the identity.
#[must_use]
pub fn normal_matrix(transform: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*transform);
    if linear.determinant().abs() <= f32::EPSILON {
        return Mat3::IDENTITY;
    }
    linear.inverse().transpose()
}

/// `count` transforms scattered around a ring of `radius` in the XZ plane.
///
/// Each transform is translate · scale · rotate. The translation sits at an
/// even angular step on the ring, displaced by a random amount in
/// `[-offset, offset)` on every axis (y squashed by
/// [`RING_VERTICAL_SCALE`]); `offset <= 0` places instances exactly on the
/// ring. Scale is uniform in `[0.05, 0.25)` and rotation is a random angle
/// about [`RING_ROTATION_AXIS`]. The same seed always yields the same ring.
#[must_use]
pub fn asteroid_ring(
    count: usize,
    radius: f32,
    offset: f32,
    seed: u64,
) -> Vec<Mat4> {
    let mut rng = StdRng::seed_from_u64(seed);
    let axis = RING_ROTATION_AXIS.normalize();

    let displacement = |rng: &mut StdRng| {
        if offset > 0.0 {
            rng.random_range(-offset..offset)
        } else {
            0.0
        }
    };

    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let x = angle.sin() * radius + displacement(&mut rng);
            let y = displacement(&mut rng) * RING_VERTICAL_SCALE;
            let z = angle.cos() * radius + displacement(&mut rng);

            let scale =
                rng.random_range(MIN_INSTANCE_SCALE..MAX_INSTANCE_SCALE);
            let rotation = rng.random_range(0.0..TAU);

            Mat4::from_translation(Vec3::new(x, y, z))
                * Mat4::from_scale(Vec3::splat(scale))
                * Mat4::from_axis_angle(axis, rotation)
        })
        .collect()
}

/// Instance data for every transform whose copy of `bounds` touches
/// `frustum`.
#[must_use]
pub fn visible_instances(
    transforms: &[Mat4],
    bounds: &Bounds,
    frustum: &Frustum,
) -> Vec<InstanceRaw> {
    transforms
        .iter()
        .filter(|transform| {
            let sphere = bounds.transformed(transform);
            frustum.intersects_sphere(sphere.center, sphere.radius)
        })
        .map(InstanceRaw::from_transform)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_layout_is_tightly_packed() {
        assert_eq!(size_of::<InstanceRaw>(), 100);
        let layout = InstanceRaw::layout();
        assert_eq!(layout.array_stride, 100);
        assert_eq!(layout.attributes.first().map(|a| a.shader_location), Some(5));
        assert_eq!(layout.attributes.last().map(|a| a.offset), Some(88));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let transform = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let normal = normal_matrix(&transform);
        assert!(normal.x_axis.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
        assert_eq!(normal_matrix(&Mat4::ZERO), Mat3::IDENTITY);
    }

    #[test]
    fn ring_is_deterministic_per_seed() {
        let a = asteroid_ring(32, 50.0, 2.5, 7);
        let b = asteroid_ring(32, 50.0, 2.5, 7);
        let c = asteroid_ring(32, 50.0, 2.5, 8);
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ring_instances_stay_within_displacement() {
        let (radius, offset) = (50.0, 2.5);
        for transform in asteroid_ring(200, radius, offset, 1) {
            let (scale, _, translation) =
                transform.to_scale_rotation_translation();
            let planar = Vec3::new(translation.x, 0.0, translation.z).length();
            assert!((planar - radius).abs() <= offset * 2.0_f32.sqrt() + 1e-3);
            assert!(translation.y.abs() <= offset * RING_VERTICAL_SCALE);
            assert!(scale.x >= MIN_INSTANCE_SCALE - 1e-5);
            assert!(scale.x < MAX_INSTANCE_SCALE + 1e-5);
            assert!((scale.x - scale.y).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_offset_places_instances_on_the_ring() {
        let ring = asteroid_ring(4, 10.0, 0.0, 3);
        let first = ring[0].w_axis.truncate();
        assert!(first.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));
        for transform in &ring {
            assert_eq!(transform.w_axis.y, 0.0);
        }
    }

    #[test]
    fn empty_ring() {
        assert!(asteroid_ring(0, 10.0, 1.0, 1).is_empty());
    }

    #[test]
    fn culling_keeps_instances_in_view() {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let frustum = Frustum::from_view_projection(proj * view);
        let bounds = Bounds {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let transforms = [
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(0.0, 0.0, 50.0)),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -20.0)),
        ];
        let visible = visible_instances(&transforms, &bounds, &frustum);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0], InstanceRaw::default());
    }
}
