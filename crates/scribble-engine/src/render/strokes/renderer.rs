use crate::buffer::PageAlignedArray;
use crate::geom::{Color, Stroke, Vertex, DEFAULT_THICKNESS, FLOATS_PER_VERTEX};

use super::commands::{StrokeCommand, StrokeInbox};
use super::error::{StrokeRenderError, Unavailable};
use super::surface::{DrawCall, StrokeSurface};
use super::wgpu_surface::StrokeGpuCache;

/// Stroke renderer configuration.
#[derive(Debug, Clone)]
pub struct StrokeConfig {
    /// Color of strokes started implicitly by `append`.
    pub default_color: Color,

    /// Ribbon width used when no thickness is given, in scene units.
    pub default_thickness: f32,

    /// Initial vertex array space, in floats. Rounded up to whole pages.
    pub initial_space: usize,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            default_color: Color::black(),
            default_thickness: DEFAULT_THICKNESS,
            initial_space: 1,
        }
    }
}

/// A finished stroke and the region of the vertex array holding its ribbon.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStroke {
    pub stroke: Stroke,
    /// First float of the ribbon in the shared vertex array.
    pub float_start: usize,
    /// Floats the ribbon occupies.
    pub float_len: usize,
}

impl CompletedStroke {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.float_len / FLOATS_PER_VERTEX
    }
}

/// Turns strokes into ribbons in one shared, page-aligned vertex array and draws
/// them with one call per stroke.
///
/// States: idle (no active stroke) and drawing. Starting a stroke completes the
/// previous one; [`finish_stroke`](Self::finish_stroke) completes it without
/// starting another.
///
/// Layout of the vertex array:
///
/// ```text
/// | stroke 0 | stroke 1 | ... | active stroke -> (grows)
///                             ^ active_start
/// ```
///
/// Completed regions are written once, when their stroke completes, and never
/// touched again. The active stroke's region is rewritten every frame from
/// `active_start`; since ribbons only grow at the tail, unchanged floats are not
/// re-uploaded.
///
/// GPU resources live in `C`, the cache type of the [`StrokeSurface`] passed to
/// [`render`](Self::render).
#[derive(Debug)]
pub struct StrokeRenderer<C = StrokeGpuCache> {
    config: StrokeConfig,

    vertices: PageAlignedArray<f32>,
    completed: Vec<CompletedStroke>,
    active: Option<Stroke>,
    active_start: usize,

    /// Space of the array when the GPU buffer was last created.
    gpu_space: Option<usize>,

    scratch: Vec<f32>,
    draws: Vec<DrawCall>,
    cache: C,
}

impl<C: Default> Default for StrokeRenderer<C> {
    fn default() -> Self {
        Self::new(StrokeConfig::default())
    }
}

impl<C: Default> StrokeRenderer<C> {
    pub fn new(config: StrokeConfig) -> Self {
        let vertices = PageAlignedArray::with_space(config.initial_space);
        Self {
            config,
            vertices,
            completed: Vec::new(),
            active: None,
            active_start: 0,
            gpu_space: None,
            scratch: Vec::new(),
            draws: Vec::new(),
            cache: C::default(),
        }
    }
}

impl<C> StrokeRenderer<C> {
    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    /// Completed strokes plus the active one, if any.
    pub fn stroke_count(&self) -> usize {
        self.completed.len() + usize::from(self.active.is_some())
    }

    pub fn completed_strokes(&self) -> &[CompletedStroke] {
        &self.completed
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Float offset where the active stroke's ribbon begins.
    pub fn active_start(&self) -> usize {
        self.active_start
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Logical contents of the shared vertex array.
    pub fn vertex_floats(&self) -> &[f32] {
        self.vertices.as_slice()
    }

    /// Physical capacity of the shared vertex array, in floats.
    pub fn space(&self) -> usize {
        self.vertices.space()
    }

    /// Draws issued by the last successful `render`.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Completes the active stroke (if any) and starts an empty one with the default
    /// thickness.
    pub fn start_new_stroke(&mut self, color: Color) {
        let thickness = self.config.default_thickness;
        self.begin_stroke(color, thickness);
    }

    /// Like [`start_new_stroke`](Self::start_new_stroke) with an explicit width.
    ///
    /// A non-positive or non-finite thickness falls back to the default.
    pub fn start_new_stroke_with_thickness(&mut self, color: Color, thickness: f32) {
        let thickness = if thickness.is_finite() && thickness > 0.0 {
            thickness
        } else {
            log::warn!(
                "invalid stroke thickness {thickness}; using {}",
                self.config.default_thickness
            );
            self.config.default_thickness
        };
        self.begin_stroke(color, thickness);
    }

    /// Completes the active stroke without starting another.
    ///
    /// Returns `false` when idle.
    pub fn finish_stroke(&mut self) -> bool {
        let Some(stroke) = self.active.take() else {
            return false;
        };

        let float_len = self.write_stroke_at(&stroke, self.active_start);

        if stroke.is_empty() {
            log::trace!("discarding empty stroke");
        } else {
            log::debug!(
                "stroke #{} completed: {} points, {} vertices",
                self.completed.len(),
                stroke.len(),
                float_len / FLOATS_PER_VERTEX
            );
            self.completed.push(CompletedStroke {
                stroke,
                float_start: self.active_start,
                float_len,
            });
        }

        self.active_start = self.vertices.len();
        true
    }

    /// Appends a sample to the active stroke, starting one with the default color
    /// when idle.
    pub fn append(&mut self, vertex: Vertex) {
        self.active_or_start().append(vertex);
    }

    /// Appends samples in order to the active stroke, starting one when idle.
    pub fn append_many<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Vertex>,
    {
        self.active_or_start().append_many(vertices);
    }

    /// Applies one queued command.
    pub fn apply(&mut self, cmd: StrokeCommand) {
        match cmd {
            StrokeCommand::Start {
                color,
                thickness: Some(t),
            } => self.start_new_stroke_with_thickness(color, t),
            StrokeCommand::Start {
                color,
                thickness: None,
            } => self.start_new_stroke(color),
            StrokeCommand::Append(v) => self.append(v),
            StrokeCommand::AppendMany(vs) => self.append_many(vs),
            StrokeCommand::Finish => {
                self.finish_stroke();
            }
        }
    }

    /// Applies every pending command from `inbox`, in arrival order.
    ///
    /// Returns the number of commands applied.
    pub fn drain(&mut self, inbox: &StrokeInbox) -> usize {
        let mut applied = 0;
        while let Some(cmd) = inbox.try_next() {
            self.apply(cmd);
            applied += 1;
        }
        applied
    }

    /// Writes the active stroke's ribbon into the vertex array without drawing.
    ///
    /// `render` does this itself; exposed for callers that read the array back.
    pub fn update_active_geometry(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.write_stroke_at(&stroke, self.active_start);
            self.active = Some(stroke);
        }
    }

    /// Per-frame entry point.
    ///
    /// 1. Fails with `RenderingUnavailable` when no stroke exists or `surface` cannot
    ///    render, and with `PipelineUnavailable` when the pipeline cannot be built.
    ///    Both happen before any state changes.
    /// 2. Writes the active stroke's ribbon from `active_start`.
    /// 3. Recreates the GPU buffer when none exists or the array's space changed;
    ///    otherwise uploads only the floats that changed.
    /// 4. Draws each completed stroke, then the active one.
    pub fn render<S>(&mut self, surface: &mut S) -> Result<(), StrokeRenderError>
    where
        S: StrokeSurface<Cache = C>,
    {
        if self.stroke_count() == 0 {
            return Err(Unavailable::NoStrokes.into());
        }
        surface.check_available()?;
        surface.prepare_pipeline(&mut self.cache)?;

        self.update_active_geometry();
        self.sync_gpu_buffer(surface);
        self.plan_draws();

        surface.draw_strokes(&self.cache, &self.draws);
        Ok(())
    }

    fn begin_stroke(&mut self, color: Color, thickness: f32) {
        self.finish_stroke();
        debug_assert_eq!(self.active_start, self.vertices.len());

        log::trace!("stroke started at float {}", self.active_start);
        self.active = Some(Stroke::with_thickness(color, thickness));
    }

    fn active_or_start(&mut self) -> &mut Stroke {
        let (color, thickness) = (self.config.default_color, self.config.default_thickness);
        if self.active.is_none() {
            // Idle implies everything written so far belongs to completed strokes.
            debug_assert_eq!(self.active_start, self.vertices.len());
            log::trace!("append while idle; starting stroke at float {}", self.active_start);
        }
        self.active
            .get_or_insert_with(|| Stroke::with_thickness(color, thickness))
    }

    /// Writes `stroke`'s ribbon from `start`, overwriting below `len` and appending
    /// past it. Returns the ribbon's float count.
    fn write_stroke_at(&mut self, stroke: &Stroke, start: usize) -> usize {
        self.scratch.clear();
        stroke.write_floats(&mut self.scratch);

        let end = start + self.scratch.len();
        let len = self.vertices.len();
        if end > len {
            self.vertices.reserve(end - len);
        }

        for (i, &value) in self.scratch.iter().enumerate() {
            let index = start + i;
            if index < self.vertices.len() {
                self.vertices.set(index, value);
            } else {
                self.vertices.push(value);
            }
        }

        self.scratch.len()
    }

    fn sync_gpu_buffer<S>(&mut self, surface: &mut S)
    where
        S: StrokeSurface<Cache = C>,
    {
        let space = self.vertices.space();
        if self.gpu_space != Some(space) {
            log::debug!(
                "allocating stroke vertex buffer: {} floats ({} bytes)",
                space,
                self.vertices.space_bytes()
            );
            surface.allocate_vertex_buffer(&mut self.cache, self.vertices.as_backing_slice());
            self.vertices.take_dirty();
            self.gpu_space = Some(space);
            return;
        }

        if let Some(range) = self.vertices.take_dirty() {
            let data = &self.vertices.as_backing_slice()[range.clone()];
            surface.write_vertex_buffer(&mut self.cache, range.start, data);
        }
    }

    fn plan_draws(&mut self) {
        const FLOAT_SIZE: u64 = core::mem::size_of::<f32>() as u64;

        self.draws.clear();

        let completed = self.completed.iter().map(|c| (c.float_start, c.float_len));
        let active = self
            .active
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|_| (self.active_start, self.vertices.len() - self.active_start));

        for (float_start, float_len) in completed.chain(active) {
            let vertex_count = (float_len / FLOATS_PER_VERTEX) as u32;
            if vertex_count == 0 {
                continue;
            }
            self.draws.push(DrawCall {
                byte_offset: float_start as u64 * FLOAT_SIZE,
                vertex_count,
            });
        }
    }
}
