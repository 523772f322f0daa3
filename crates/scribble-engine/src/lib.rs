//! Scribble engine.
//!
//! Ribbon stroke geometry and its GPU renderer ([`geom`], [`buffer`],
//! [`render::strokes`]), plus the platform runtime that drives it: wgpu device
//! and surface, winit window loop, input translation, frame clock and logging.

pub mod buffer;
pub mod coords;
pub mod core;
pub mod device;
pub mod geom;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
