//! Converts raw platform events into viewer commands.
//!
//! The `InputProcessor` owns all transient input state (held keys, the last
//! cursor position) and the key-binding map. Discrete actions come out of
//! [`InputProcessor::handle_event`] as [`ViewerCommand`]s; continuous
//! movement is polled once per frame through [`InputProcessor::movement`].

use std::collections::HashMap;

use glam::Vec2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::event::InputEvent;
use super::keyboard::KeyAction;
use crate::camera::CameraMovement;
use crate::renderer::ViewerCommand;

/// Maps physical key strings to [`KeyAction`]s.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyW"`, `"Escape"`, `"ArrowUp"`, etc. Several keys may share an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → action.
    pub bindings: HashMap<String, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyW".into(), KeyAction::MoveForward),
            ("KeyS".into(), KeyAction::MoveBackward),
            ("KeyA".into(), KeyAction::StrafeLeft),
            ("KeyD".into(), KeyAction::StrafeRight),
            ("ArrowUp".into(), KeyAction::MoveForward),
            ("ArrowDown".into(), KeyAction::MoveBackward),
            ("ArrowLeft".into(), KeyAction::StrafeLeft),
            ("ArrowRight".into(), KeyAction::StrafeRight),
            ("KeyF".into(), KeyAction::ToggleWireframe),
            ("Escape".into(), KeyAction::Quit),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the action for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }
}

/// Converts raw window events into [`ViewerCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input.handle_event(event) {
///     renderer.execute(cmd);
/// }
/// // Once per frame:
/// renderer.update(dt, &input.movement());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Key string → action mapping.
    key_bindings: KeyBindings,
    /// Keys currently held down.
    held_keys: FxHashSet<String>,
    /// Last absolute cursor position; `None` until the first sample.
    last_cursor: Option<Vec2>,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::default()
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewerCommand> {
        match event {
            InputEvent::Key { key, pressed } => self.handle_key(key, pressed),
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseMotion { dx, dy } => {
                Some(ViewerCommand::Look { dx, dy: -dy })
            }
            InputEvent::Scroll { delta } => Some(ViewerCommand::Zoom { delta }),
            InputEvent::FocusLost => {
                self.held_keys.clear();
                self.last_cursor = None;
                None
            }
        }
    }

    /// Movement directions whose keys are currently held, each at most once,
    /// in [`CameraMovement::ALL`] order.
    #[must_use]
    pub fn movement(&self) -> Vec<CameraMovement> {
        let held: FxHashSet<CameraMovement> = self
            .held_keys
            .iter()
            .filter_map(|key| self.key_bindings.lookup(key))
            .filter_map(KeyAction::movement)
            .collect();
        CameraMovement::ALL
            .into_iter()
            .filter(|m| held.contains(m))
            .collect()
    }

    fn handle_key(&mut self, key: String, pressed: bool) -> Option<ViewerCommand> {
        let action = self.key_bindings.lookup(&key);
        if !pressed {
            let _ = self.held_keys.remove(&key);
            return None;
        }
        // Auto-repeat arrives as further presses of a held key.
        let repeat = !self.held_keys.insert(key);
        match action {
            Some(KeyAction::ToggleWireframe) if !repeat => {
                Some(ViewerCommand::ToggleWireframe)
            }
            Some(KeyAction::Quit) if !repeat => Some(ViewerCommand::Quit),
            _ => None,
        }
    }

    /// The first sample only establishes the reference position, so the
    /// view doesn't jump when the cursor enters the window.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<ViewerCommand> {
        let current = Vec2::new(x, y);
        let last = self.last_cursor.replace(current)?;
        let delta = current - last;
        // Screen y grows downward; looking up wants a positive offset.
        Some(ViewerCommand::Look {
            dx: delta.x,
            dy: -delta.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, pressed: bool) -> InputEvent {
        InputEvent::Key {
            key: name.into(),
            pressed,
        }
    }

    #[test]
    fn first_cursor_sample_is_swallowed() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 400.0, y: 300.0 }),
            None
        );
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 410.0, y: 290.0 }),
            Some(ViewerCommand::Look { dx: 10.0, dy: 10.0 })
        );
    }

    #[test]
    fn focus_loss_resets_cursor_and_keys() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = input.handle_event(key("KeyW", true));
        assert_eq!(input.movement(), vec![CameraMovement::Forward]);

        let _ = input.handle_event(InputEvent::FocusLost);
        assert!(input.movement().is_empty());
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 50.0, y: 50.0 }),
            None
        );
    }

    #[test]
    fn held_keys_produce_ordered_unique_movement() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(key("KeyD", true));
        let _ = input.handle_event(key("KeyW", true));
        let _ = input.handle_event(key("ArrowUp", true));
        assert_eq!(
            input.movement(),
            vec![CameraMovement::Forward, CameraMovement::Right]
        );

        // Releasing one of two keys bound to Forward keeps moving forward.
        let _ = input.handle_event(key("KeyW", false));
        assert_eq!(
            input.movement(),
            vec![CameraMovement::Forward, CameraMovement::Right]
        );
        let _ = input.handle_event(key("ArrowUp", false));
        assert_eq!(input.movement(), vec![CameraMovement::Right]);
    }

    #[test]
    fn discrete_actions_ignore_auto_repeat() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(key("KeyF", true)),
            Some(ViewerCommand::ToggleWireframe)
        );
        assert_eq!(input.handle_event(key("KeyF", true)), None);
        assert_eq!(input.handle_event(key("KeyF", false)), None);
        assert_eq!(
            input.handle_event(key("KeyF", true)),
            Some(ViewerCommand::ToggleWireframe)
        );
        assert_eq!(
            input.handle_event(key("Escape", true)),
            Some(ViewerCommand::Quit)
        );
    }

    #[test]
    fn scroll_and_raw_motion_map_directly() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -2.0 }),
            Some(ViewerCommand::Zoom { delta: -2.0 })
        );
        assert_eq!(
            input.handle_event(InputEvent::MouseMotion { dx: 3.0, dy: 4.0 }),
            Some(ViewerCommand::Look { dx: 3.0, dy: -4.0 })
        );
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let bindings = KeyBindings {
            bindings: HashMap::from([("KeyI".into(), KeyAction::MoveForward)]),
        };
        let mut input = InputProcessor::with_key_bindings(bindings);
        let _ = input.handle_event(key("KeyW", true));
        assert!(input.movement().is_empty());
        let _ = input.handle_event(key("KeyI", true));
        assert_eq!(input.movement(), vec![CameraMovement::Forward]);
        assert_eq!(input.key_bindings().lookup("Escape"), None);
    }
}
