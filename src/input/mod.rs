//! Input handling: event types, key actions, and the input processor that
//! converts raw window events into viewer commands.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Converts raw events into viewer commands and held movement.
pub mod processor;

pub use event::InputEvent;
pub use keyboard::KeyAction;
pub use processor::{InputProcessor, KeyBindings};
