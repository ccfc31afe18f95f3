//! The viewer's discrete interactive vocabulary.
//!
//! Key presses, mouse motion and scroll are turned into `ViewerCommand`s by
//! the [`InputProcessor`](crate::input::InputProcessor) and applied with
//! [`SceneRenderer::execute`](super::SceneRenderer::execute). Continuous
//! movement is not a command; it is polled once per frame.

/// A discrete action applied to the running viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Turn the camera by a mouse offset (y already inverted, positive =
    /// look up).
    Look {
        /// Horizontal offset.
        dx: f32,
        /// Vertical offset.
        dy: f32,
    },

    /// Narrow or widen the field of view (positive = zoom in).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    // ── Display ─────────────────────────────────────────────────────
    /// Switch between filled and line polygon rasterization.
    ToggleWireframe,

    // ── Lifecycle ───────────────────────────────────────────────────
    /// Close the viewer.
    Quit,
}

impl ViewerCommand {
    /// Whether this command ends the session.
    #[must_use]
    pub fn is_quit(self) -> bool {
        matches!(self, Self::Quit)
    }
}
