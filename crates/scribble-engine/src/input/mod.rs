//! Input subsystem.
//!
//! Platform-agnostic events and per-window state. [`platform::winit`] translates
//! window events into [`InputEvent`]s; nothing else here touches winit.

mod frame;
pub mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent,
};
