//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! frame's encoder through a [`RenderTarget`].
//!
//! Convention:
//! - Geometry is in world space (right-handed, +Y up).
//! - Vertex shaders apply a camera view-projection uniform.

mod ctx;
pub mod strokes;

pub use ctx::{RenderCtx, RenderTarget};
