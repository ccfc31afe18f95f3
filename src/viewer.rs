//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use meshview::Viewer;
//! Viewer::builder()
//!     .with_model("assets/models/backpack/backpack.obj")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::error::MeshviewError;
use crate::gpu::render_context::RenderContext;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::util::frame_timing::FrameTiming;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    model: Option<PathBuf>,
    options: Option<Options>,
    title: Option<String>,
}

impl ViewerBuilder {
    /// Builder with default options and no model (the built-in scene).
    fn new() -> Self {
        Self {
            model: None,
            options: None,
            title: None,
        }
    }

    /// Model file to display (`.obj`).
    #[must_use]
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`]. An explicit model or
    /// title overrides the one in the options.
    #[must_use]
    pub fn build(self) -> Viewer {
        let mut options = self.options.unwrap_or_default();
        if let Some(model) = self.model {
            options.scene.model = Some(model);
        }
        if let Some(title) = self.title {
            options.window.title = title;
        }
        Viewer { options }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays a model with a fly camera.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// The options the window will open with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed or a quit key is pressed.
    ///
    /// # Errors
    ///
    /// Returns [`MeshviewError::Viewer`] if the event loop can't be created
    /// or fails while running.
    pub fn run(self) -> Result<(), MeshviewError> {
        let event_loop = EventLoop::new()
            .map_err(|e| MeshviewError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            renderer: None,
            input: InputProcessor::with_key_bindings(
                self.options.keybindings.clone(),
            ),
            timing: FrameTiming::new(self.options.window.target_fps),
            cursor_captured: false,
            options: self.options,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MeshviewError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    input: InputProcessor,
    timing: FrameTiming,
    cursor_captured: bool,
    options: Options,
}

/// Surface size for a window: never zero in either dimension.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

/// Grab and hide the cursor for mouse look. Returns whether it worked.
fn capture_cursor(window: &Window) -> bool {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(e) => {
            log::warn!("cursor capture unavailable: {e}");
            false
        }
    }
}

impl ViewerApp {
    /// Feed an event through the input processor and apply the result.
    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        let Some(command) = self.input.handle_event(event) else {
            return;
        };
        if command.is_quit() {
            event_loop.exit();
        } else if let Some(renderer) = &mut self.renderer {
            renderer.execute(command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer)
        else {
            return;
        };
        if !self.timing.should_render() {
            window.request_redraw();
            return;
        }

        let dt = self.timing.tick();
        renderer.update(dt, &self.input.movement());
        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let (width, height) = viewport_size(window.inner_size());
                renderer.resize(width, height);
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory; exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_options = &self.options.window;
        let attrs = Window::default_attributes()
            .with_title(&window_options.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                window_options.width,
                window_options.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = viewport_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            size,
            window_options.vsync,
        )) {
            Ok(context) => context,
            Err(e) => {
                log::error!("Failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = match SceneRenderer::new(context, &self.options) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        };

        if self.options.window.capture_cursor {
            self.cursor_captured = capture_cursor(&window);
        }

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (width, height) = viewport_size(size);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(width, height);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::Focused(false) => {
                self.dispatch(event_loop, InputEvent::FocusLost);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                self.dispatch(
                    event_loop,
                    InputEvent::Key {
                        key: format!("{code:?}"),
                        pressed: event.state == ElementState::Pressed,
                    },
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                if !self.cursor_captured {
                    self.dispatch(
                        event_loop,
                        InputEvent::CursorMoved {
                            x: position.x as f32,
                            y: position.y as f32,
                        },
                    );
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.dispatch(event_loop, InputEvent::Scroll { delta });
            }

            _ => (),
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.cursor_captured {
                self.dispatch(
                    event_loop,
                    InputEvent::MouseMotion {
                        dx: dx as f32,
                        dy: dy as f32,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_options() {
        let viewer = Viewer::builder()
            .with_options(Options::default())
            .with_model("rock.obj")
            .with_title("Rocks")
            .build();
        assert_eq!(
            viewer.options().scene.model,
            Some(PathBuf::from("rock.obj"))
        );
        assert_eq!(viewer.options().window.title, "Rocks");
    }

    #[test]
    fn builder_defaults_to_builtin_scene() {
        let viewer = Viewer::builder().build();
        assert!(viewer.options().scene.model.is_none());
        assert_eq!(viewer.options().window.title, "meshview");
    }

    #[test]
    fn viewport_is_never_empty() {
        let size = winit::dpi::PhysicalSize::new(0, 600);
        assert_eq!(viewport_size(size), (1, 600));
    }
}
