use thiserror::Error;

/// Why a frame could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// Nothing has been drawn yet.
    #[error("no strokes to draw")]
    NoStrokes,

    /// The surface cannot supply a device or encoder this frame.
    #[error("surface unavailable: {0}")]
    Surface(String),
}

/// Frame-local stroke rendering failure.
///
/// Neither variant corrupts renderer state: the caller logs, skips the frame, and
/// calls `render` again next frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrokeRenderError {
    #[error("rendering unavailable: {0}")]
    RenderingUnavailable(#[from] Unavailable),

    /// Shader module or pipeline state could not be built.
    #[error("stroke pipeline unavailable: {0}")]
    PipelineUnavailable(String),
}

impl StrokeRenderError {
    /// True for the benign "nothing to do this frame" case.
    pub fn is_skip_frame(&self) -> bool {
        matches!(self, StrokeRenderError::RenderingUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_reason() {
        let e = StrokeRenderError::from(Unavailable::Surface("zero-area viewport".into()));
        assert_eq!(
            e.to_string(),
            "rendering unavailable: surface unavailable: zero-area viewport"
        );
        assert!(e.is_skip_frame());

        let e = StrokeRenderError::PipelineUnavailable("depth format".into());
        assert!(!e.is_skip_frame());
    }
}
