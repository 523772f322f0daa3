//! Stroke renderer.
//!
//! - [`StrokeRenderer`]: stroke state machine, shared vertex array, draw batching
//! - [`StrokeSurface`]: the per-frame GPU capability the renderer drives
//! - [`WgpuStrokeSurface`] / [`StrokeGpuCache`]: the wgpu implementation
//! - [`stroke_channel`]: queue for feeding strokes from other callbacks or threads

mod commands;
mod error;
mod renderer;
mod surface;
mod wgpu_surface;

pub use commands::{stroke_channel, StrokeCommand, StrokeInbox, StrokeSender};
pub use error::{StrokeRenderError, Unavailable};
pub use renderer::{CompletedStroke, StrokeConfig, StrokeRenderer};
pub use surface::{DrawCall, StrokeSurface};
pub use wgpu_surface::{StrokeGpuCache, WgpuStrokeSurface};
