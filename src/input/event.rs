/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`ViewerCommand`](crate::renderer::ViewerCommand)
/// values and tracks held movement keys.
///
/// # Example
///
/// ```
/// use meshview::input::{InputEvent, InputProcessor};
///
/// let mut input = InputProcessor::new();
/// let cmd = input.handle_event(InputEvent::Scroll { delta: 1.0 });
/// assert!(cmd.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key changed state.
    Key {
        /// Physical key in `winit::keyboard::KeyCode` debug format
        /// (`"KeyW"`, `"Escape"`, ...).
        key: String,
        /// `true` for press (including repeats), `false` for release.
        pressed: bool,
    },
    /// Cursor moved to an absolute window position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels (grows downward).
        y: f32,
    },
    /// Relative pointer motion, reported while the cursor is captured.
    MouseMotion {
        /// Horizontal motion.
        dx: f32,
        /// Vertical motion (positive = downward).
        dy: f32,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount in lines.
        delta: f32,
    },
    /// The window lost keyboard focus; held keys are released.
    FocusLost,
}
