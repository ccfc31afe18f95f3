use serde::{Deserialize, Serialize};

use crate::camera::CameraMovement;

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// KeyW = "move_forward"
/// KeyF = "toggle_wireframe"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fly along the view direction while held.
    MoveForward,
    /// Fly against the view direction while held.
    MoveBackward,
    /// Strafe left while held.
    StrafeLeft,
    /// Strafe right while held.
    StrafeRight,
    /// Switch between filled and line polygon mode.
    ToggleWireframe,
    /// Close the viewer.
    Quit,
}

impl KeyAction {
    /// The camera movement this action drives, for continuous actions.
    #[must_use]
    pub fn movement(self) -> Option<CameraMovement> {
        match self {
            Self::MoveForward => Some(CameraMovement::Forward),
            Self::MoveBackward => Some(CameraMovement::Backward),
            Self::StrafeLeft => Some(CameraMovement::Left),
            Self::StrafeRight => Some(CameraMovement::Right),
            Self::ToggleWireframe | Self::Quit => None,
        }
    }
}
