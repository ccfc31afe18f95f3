//! Camera system for 3D scene viewing.
//!
//! A fly camera whose state transitions are pure functions, a GPU-facing
//! controller that uploads the resulting matrices, and frustum culling.

/// Fly camera state and pure state transitions.
pub mod core;
/// GPU uniform and bind group management for the camera.
pub mod controller;
/// View frustum extraction and intersection tests.
pub mod frustum;

pub use self::controller::{CameraController, CameraUniform, Projection};
pub use self::core::{CameraBasis, CameraMovement, CameraState};
pub use self::frustum::Frustum;
