//! Window and event loop.
//!
//! Owns the winit `EventLoop` and the drawing window, and ties them to the GPU
//! layer and the app's frame callback.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
