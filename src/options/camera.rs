use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::core::{
    DEFAULT_FOV, DEFAULT_MOUSE_SENSITIVITY, DEFAULT_MOVEMENT_SPEED,
    DEFAULT_PITCH, DEFAULT_YAW,
};
use crate::camera::CameraState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Initial fly-camera state and projection parameters.
pub struct CameraOptions {
    /// Starting position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Starting yaw in degrees (−90 looks down −Z).
    #[schemars(skip)]
    pub yaw: f32,
    /// Starting pitch in degrees.
    #[schemars(skip)]
    pub pitch: f32,
    /// Starting vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 1.0, max = 45.0), extend("step" = 1.0))]
    pub fov: f32,
    /// World units per second.
    #[schemars(title = "Move Speed", range(min = 0.5, max = 50.0), extend("step" = 0.5))]
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion.
    #[schemars(title = "Look Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub mouse_sensitivity: f32,
    /// Clamp pitch to ±89° so the view never flips.
    #[schemars(skip)]
    pub constrain_pitch: bool,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            fov: DEFAULT_FOV,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            constrain_pitch: true,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl CameraOptions {
    /// Camera state described by these options.
    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            fov: self.fov,
            movement_speed: self.movement_speed,
            mouse_sensitivity: self.mouse_sensitivity,
            ..CameraState::new(Vec3::from(self.position))
                .with_orientation(self.yaw, self.pitch)
        }
    }
}
