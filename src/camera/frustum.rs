//! View frustum for culling
//!
//! Extracts the six clip planes from a view-projection matrix and tests
//! points and bounding spheres against them.

use glam::{Mat4, Vec3, Vec4};

/// A plane `normal · p + distance = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub distance: f32,
}

impl Plane {
    /// Normalize raw plane coefficients `(a, b, c, d)`.
    ///
    /// Degenerate coefficients produce a plane that accepts everything.
    pub fn from_vec4(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                distance: coefficients.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from `point` to the plane (positive = inside).
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Six inward-facing clip planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// The clip planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Gribb/Hartmann plane extraction for a right-handed projection with a
    /// [0, 1] depth range.
    pub fn from_view_projection(view_proj: Mat4) -> Self {
        let (r0, r1, r2, r3) = (
            view_proj.row(0),
            view_proj.row(1),
            view_proj.row(2),
            view_proj.row(3),
        );
        Self {
            planes: [
                Plane::from_vec4(r3 + r0),
                Plane::from_vec4(r3 - r0),
                Plane::from_vec4(r3 + r1),
                Plane::from_vec4(r3 - r1),
                Plane::from_vec4(r2),
                Plane::from_vec4(r3 - r2),
            ],
        }
    }

    /// Whether `point` lies inside all six planes.
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) >= 0.0)
    }

    /// Whether a sphere is at least partly inside the frustum.
    #[inline]
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| p.distance_to_point(center) >= -radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_negative_z() -> Frustum {
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view =
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(proj * view)
    }

    #[test]
    fn contains_points_in_front_only() {
        let frustum = looking_down_negative_z();
        assert!(frustum.contains_point(Vec3::ZERO));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 20.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0)));
        assert!(!frustum.contains_point(Vec3::new(50.0, 0.0, 0.0)));
    }

    #[test]
    fn spheres_straddling_a_plane_intersect() {
        let frustum = looking_down_negative_z();
        assert!(frustum.intersects_sphere(Vec3::ZERO, 1.0));
        assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 50.0), 1.0));
        // Center just behind the eye, radius reaching past the near plane.
        assert!(frustum.intersects_sphere(Vec3::new(0.0, 0.0, 10.5), 1.0));
    }
}
