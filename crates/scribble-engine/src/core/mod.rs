//! Contract between the runtime loop and applications.
//!
//! Apps implement [`App`] and receive a [`FrameCtx`] per rendered frame; the
//! runtime's winit and ouroboros plumbing stays out of their way.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
