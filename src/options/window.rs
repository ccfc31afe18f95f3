use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Window", inline)]
#[serde(default)]
/// Window and presentation settings.
pub struct WindowOptions {
    /// Window title.
    #[schemars(skip)]
    pub title: String,
    /// Initial inner width in logical pixels.
    #[schemars(skip)]
    pub width: u32,
    /// Initial inner height in logical pixels.
    #[schemars(skip)]
    pub height: u32,
    /// Synchronize presentation with the display refresh.
    #[schemars(title = "VSync")]
    pub vsync: bool,
    /// Grab and hide the cursor for mouse look.
    #[schemars(title = "Capture Cursor")]
    pub capture_cursor: bool,
    /// Frame cap; zero means uncapped.
    #[schemars(title = "Target FPS", range(min = 0, max = 360))]
    pub target_fps: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "meshview".to_owned(),
            width: 800,
            height: 600,
            vsync: true,
            capture_cursor: true,
            target_fps: 0,
        }
    }
}
