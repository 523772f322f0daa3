use super::error::StrokeRenderError;

/// One draw of a stroke's ribbon out of the shared vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    /// Offset of the stroke's first vertex in the buffer, in bytes.
    pub byte_offset: u64,
    /// Triangle-list vertices to draw from that offset.
    pub vertex_count: u32,
}

/// Per-frame GPU capability the [`StrokeRenderer`](super::StrokeRenderer) drives.
///
/// The renderer owns the `Cache` across frames and hands it back on every call, so
/// pipelines and buffers live in one explicit place instead of on the surface.
///
/// Call order within a frame:
/// 1. [`check_available`](Self::check_available)
/// 2. [`prepare_pipeline`](Self::prepare_pipeline)
/// 3. [`allocate_vertex_buffer`](Self::allocate_vertex_buffer) or
///    [`write_vertex_buffer`](Self::write_vertex_buffer), as needed
/// 4. [`draw_strokes`](Self::draw_strokes)
pub trait StrokeSurface {
    /// GPU resources kept between frames.
    type Cache: Default;

    /// Fails with `RenderingUnavailable` when this frame cannot be rendered.
    fn check_available(&self) -> Result<(), StrokeRenderError>;

    /// Builds (or reuses) the stroke pipeline. Fails with `PipelineUnavailable`.
    fn prepare_pipeline(&mut self, cache: &mut Self::Cache) -> Result<(), StrokeRenderError>;

    /// (Re)creates the vertex buffer from the full backing storage.
    fn allocate_vertex_buffer(&mut self, cache: &mut Self::Cache, contents: &[f32]);

    /// Patches the existing vertex buffer starting at `float_offset`.
    fn write_vertex_buffer(&mut self, cache: &mut Self::Cache, float_offset: usize, data: &[f32]);

    /// Records the draws, in order, against the current vertex buffer.
    fn draw_strokes(&mut self, cache: &Self::Cache, calls: &[DrawCall]);
}
