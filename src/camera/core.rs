use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Initial yaw in degrees; -90 faces down the negative Z axis.
pub const DEFAULT_YAW: f32 = -90.0;
/// Initial pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// World units travelled per second of held movement.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 3.0;
/// Degrees of rotation per unit of mouse offset.
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.25;
/// Initial vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 45.0;
/// Pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]` when constrained.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view reachable by zooming.
pub const MIN_FOV: f32 = 1.0;
/// Widest field of view reachable by zooming.
pub const MAX_FOV: f32 = 45.0;

/// Discrete movement directions, relative to where the camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMovement {
    /// Along the front vector.
    Forward,
    /// Against the front vector.
    Backward,
    /// Against the right vector.
    Left,
    /// Along the right vector.
    Right,
}

impl CameraMovement {
    /// All directions in the order movement is applied each frame.
    pub const ALL: [Self; 4] =
        [Self::Forward, Self::Backward, Self::Left, Self::Right];
}

/// Orthonormal frame derived from a [`CameraState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Viewing direction.
    pub front: Vec3,
    /// Camera-space +X in world space.
    pub right: Vec3,
    /// Camera-space +Y in world space.
    pub up: Vec3,
}

/// Fly camera as a plain data record.
///
/// Every operation consumes the state and returns the next one, so the
/// camera can be driven and tested without a graphics context. The basis
/// vectors are derived on demand from yaw and pitch rather than stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position in world space.
    pub position: Vec3,
    /// World up direction used to derive the right vector.
    pub world_up: Vec3,
    /// Rotation about the world up axis, in degrees.
    pub yaw: f32,
    /// Elevation above the horizon, in degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per unit of mouse offset.
    pub mouse_sensitivity: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            fov: DEFAULT_FOV,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
        }
    }
}

impl CameraState {
    /// Camera at `position` with default orientation and tuning.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Replace yaw and pitch (degrees).
    #[must_use]
    pub fn with_orientation(self, yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch, ..self }
    }

    /// Replace the world up direction.
    #[must_use]
    pub fn with_world_up(self, world_up: Vec3) -> Self {
        Self { world_up, ..self }
    }

    /// Derive the front/right/up frame from yaw and pitch.
    #[must_use]
    pub fn basis(&self) -> CameraBasis {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();
        let right = front.cross(self.world_up).normalize();
        let up = right.cross(front).normalize();
        CameraBasis { front, right, up }
    }

    /// Move `movement_speed * dt` world units in `direction`.
    #[must_use]
    pub fn advance(self, direction: CameraMovement, dt: f32) -> Self {
        let velocity = self.movement_speed * dt;
        let basis = self.basis();
        let offset = match direction {
            CameraMovement::Forward => basis.front * velocity,
            CameraMovement::Backward => -basis.front * velocity,
            CameraMovement::Left => -basis.right * velocity,
            CameraMovement::Right => basis.right * velocity,
        };
        Self {
            position: self.position + offset,
            ..self
        }
    }

    /// Turn by a mouse offset. `dy` is positive when the mouse moves up.
    ///
    /// With `constrain_pitch` the pitch stays within ±[`PITCH_LIMIT`] so the
    /// view never flips over the pole.
    #[must_use]
    pub fn look(self, dx: f32, dy: f32, constrain_pitch: bool) -> Self {
        let yaw = self.yaw + dx * self.mouse_sensitivity;
        let mut pitch = self.pitch + dy * self.mouse_sensitivity;
        if constrain_pitch {
            pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        Self { yaw, pitch, ..self }
    }

    /// Narrow (positive `dy`) or widen the field of view, clamped to
    /// [`MIN_FOV`]..=[`MAX_FOV`].
    #[must_use]
    pub fn zoom(self, dy: f32) -> Self {
        Self {
            fov: (self.fov - dy).clamp(MIN_FOV, MAX_FOV),
            ..self
        }
    }

    /// Right-handed look-at matrix from the eye along the front vector.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let basis = self.basis();
        Mat4::look_at_rh(self.position, self.position + basis.front, basis.up)
    }

    /// Perspective projection for this camera's field of view.
    ///
    /// Uses the [0, 1] depth range expected by wgpu.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, znear, zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn default_faces_negative_z() {
        let basis = CameraState::default().basis();
        assert!(close(basis.front, Vec3::NEG_Z));
        assert!(close(basis.right, Vec3::X));
        assert!(close(basis.up, Vec3::Y));
    }

    #[test]
    fn basis_is_orthonormal_at_steep_pitch() {
        let state = CameraState::default().with_orientation(33.0, 80.0);
        let b = state.basis();
        for v in [b.front, b.right, b.up] {
            assert!((v.length() - 1.0).abs() < EPS);
        }
        assert!(b.front.dot(b.right).abs() < EPS);
        assert!(b.front.dot(b.up).abs() < EPS);
        assert!(b.right.dot(b.up).abs() < EPS);
    }

    #[test]
    fn advance_moves_along_basis() {
        let start = CameraState::default();
        let forward = start.advance(CameraMovement::Forward, 1.0);
        assert!(close(forward.position, Vec3::new(0.0, 0.0, -3.0)));

        let back = forward.advance(CameraMovement::Backward, 1.0);
        assert!(close(back.position, Vec3::ZERO));

        let left = start.advance(CameraMovement::Left, 0.5);
        assert!(close(left.position, Vec3::new(-1.5, 0.0, 0.0)));

        let right = start.advance(CameraMovement::Right, 0.5);
        assert!(close(right.position, Vec3::new(1.5, 0.0, 0.0)));

        // Orientation is untouched by movement.
        assert_eq!(right.yaw, start.yaw);
        assert_eq!(right.pitch, start.pitch);
    }

    #[test]
    fn look_scales_by_sensitivity_and_clamps_pitch() {
        let turned = CameraState::default().look(100.0, 1000.0, true);
        assert_eq!(turned.yaw, DEFAULT_YAW + 25.0);
        assert_eq!(turned.pitch, PITCH_LIMIT);

        let down = CameraState::default().look(0.0, -1000.0, true);
        assert_eq!(down.pitch, -PITCH_LIMIT);

        let free = CameraState::default().look(0.0, 1000.0, false);
        assert_eq!(free.pitch, 250.0);
    }

    #[test]
    fn zoom_clamps_field_of_view() {
        let state = CameraState::default();
        assert_eq!(state.zoom(10.0).fov, 35.0);
        assert_eq!(state.zoom(100.0).fov, MIN_FOV);
        assert_eq!(state.zoom(-100.0).fov, MAX_FOV);
        assert_eq!(state.zoom(10.0).zoom(-4.0).fov, 39.0);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let state = CameraState::new(Vec3::new(1.0, 2.0, 3.0))
            .with_orientation(-45.0, 20.0);
        let view = state.view_matrix();
        assert!(close(view.transform_point3(state.position), Vec3::ZERO));

        let ahead = state.position + state.basis().front;
        assert!(close(view.transform_point3(ahead), Vec3::NEG_Z));
    }

    #[test]
    fn world_up_changes_the_right_vector() {
        let state = CameraState::default().with_world_up(Vec3::NEG_Y);
        assert!(close(state.basis().right, Vec3::NEG_X));
    }
}
