use scribble_engine::geom::{Color, Vertex, FLOATS_PER_VERTEX, VERTICES_PER_SEGMENT};
use scribble_engine::render::strokes::{
    stroke_channel, DrawCall, StrokeConfig, StrokeRenderError, StrokeRenderer, StrokeSurface,
    Unavailable,
};

const SEGMENT_FLOATS: usize = VERTICES_PER_SEGMENT * FLOATS_PER_VERTEX;
const SEGMENT_VERTICES: u32 = VERTICES_PER_SEGMENT as u32;

/// CPU mirror of the GPU vertex buffer plus counters.
#[derive(Debug, Default)]
struct RecordingCache {
    buffer: Vec<f32>,
    allocations: usize,
    writes: Vec<(usize, usize)>,
    pipeline_builds: usize,
}

/// Surface that records what the renderer asks of it.
#[derive(Debug)]
struct RecordingSurface {
    available: bool,
    pipeline_ok: bool,
    frames: Vec<Vec<DrawCall>>,
}

impl RecordingSurface {
    fn ready() -> Self {
        Self {
            available: true,
            pipeline_ok: true,
            frames: Vec::new(),
        }
    }
}

impl StrokeSurface for RecordingSurface {
    type Cache = RecordingCache;

    fn check_available(&self) -> Result<(), StrokeRenderError> {
        if self.available {
            Ok(())
        } else {
            Err(Unavailable::Surface("no drawable".into()).into())
        }
    }

    fn prepare_pipeline(&mut self, cache: &mut RecordingCache) -> Result<(), StrokeRenderError> {
        if !self.pipeline_ok {
            return Err(StrokeRenderError::PipelineUnavailable("bad shader".into()));
        }
        cache.pipeline_builds += 1;
        Ok(())
    }

    fn allocate_vertex_buffer(&mut self, cache: &mut RecordingCache, contents: &[f32]) {
        cache.buffer = contents.to_vec();
        cache.allocations += 1;
    }

    fn write_vertex_buffer(&mut self, cache: &mut RecordingCache, float_offset: usize, data: &[f32]) {
        cache.buffer[float_offset..float_offset + data.len()].copy_from_slice(data);
        cache.writes.push((float_offset, data.len()));
    }

    fn draw_strokes(&mut self, _cache: &RecordingCache, calls: &[DrawCall]) {
        self.frames.push(calls.to_vec());
    }
}

type TestRenderer = StrokeRenderer<RecordingCache>;

fn pt(x: f32, y: f32) -> Vertex {
    Vertex::from_xyz(x, y, 0.0, Color::black())
}

fn line(n: usize) -> impl Iterator<Item = Vertex> {
    (0..n).map(|i| pt(i as f32 * 0.1, 0.0))
}

fn draw(byte_offset: usize, segments: u32) -> DrawCall {
    DrawCall {
        byte_offset: byte_offset as u64,
        vertex_count: segments * SEGMENT_VERTICES,
    }
}

/// RGBA of the vertex whose floats start at `float_start`.
fn color_of(buffer: &[f32], float_start: usize) -> [f32; 4] {
    [
        buffer[float_start + 4],
        buffer[float_start + 5],
        buffer[float_start + 6],
        buffer[float_start + 7],
    ]
}

#[test]
fn render_without_strokes_is_unavailable() {
    let mut r = TestRenderer::default();
    let mut surface = RecordingSurface::ready();

    let err = r.render(&mut surface).unwrap_err();
    assert_eq!(err, StrokeRenderError::RenderingUnavailable(Unavailable::NoStrokes));
    assert!(err.is_skip_frame());
    assert_eq!(r.cache().pipeline_builds, 0);
    assert!(surface.frames.is_empty());
}

#[test]
fn unavailable_surface_changes_nothing() {
    let mut r = TestRenderer::default();
    r.append_many(line(3));

    let mut surface = RecordingSurface {
        available: false,
        ..RecordingSurface::ready()
    };
    assert!(r.render(&mut surface).unwrap_err().is_skip_frame());
    assert!(r.vertex_floats().is_empty());
    assert_eq!(r.cache().allocations, 0);
    assert!(r.draw_calls().is_empty());

    surface.available = true;
    r.render(&mut surface).unwrap();
    assert_eq!(r.draw_calls(), &[draw(0, 2)]);
}

#[test]
fn pipeline_failure_is_reported_before_any_upload() {
    let mut r = TestRenderer::default();
    r.append_many(line(2));

    let mut surface = RecordingSurface {
        pipeline_ok: false,
        ..RecordingSurface::ready()
    };
    let err = r.render(&mut surface).unwrap_err();
    assert!(matches!(err, StrokeRenderError::PipelineUnavailable(_)));
    assert!(!err.is_skip_frame());
    assert_eq!(r.cache().allocations, 0);
    assert!(surface.frames.is_empty());
}

#[test]
fn first_render_allocates_whole_space() {
    let mut r = TestRenderer::default();
    r.start_new_stroke(Color::red());
    r.append_many(line(2));

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();

    let cache = r.cache();
    assert_eq!(cache.allocations, 1);
    assert!(cache.writes.is_empty());
    assert_eq!(cache.buffer.len(), r.space());
    assert_eq!(&cache.buffer[..SEGMENT_FLOATS], r.vertex_floats());
    assert_eq!(surface.frames, vec![vec![draw(0, 1)]]);
    assert_eq!(color_of(&cache.buffer, 0), Color::red().to_array());
}

#[test]
fn repeated_render_is_idempotent() {
    let mut r = TestRenderer::default();
    r.append_many(line(4));
    r.start_new_stroke(Color::blue());
    r.append_many(line(3));

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();
    let buffer = r.cache().buffer.clone();
    let floats = r.vertex_floats().to_vec();

    r.render(&mut surface).unwrap();

    assert_eq!(r.cache().allocations, 1);
    assert!(r.cache().writes.is_empty());
    assert_eq!(r.cache().buffer, buffer);
    assert_eq!(r.vertex_floats(), floats.as_slice());
    assert_eq!(surface.frames[0], surface.frames[1]);
}

#[test]
fn growing_active_stroke_uploads_only_new_floats() {
    let mut r = TestRenderer::default();
    r.append_many(line(2));

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();

    r.append(pt(0.5, 0.5));
    r.render(&mut surface).unwrap();

    assert_eq!(r.cache().allocations, 1);
    assert_eq!(r.cache().writes, vec![(SEGMENT_FLOATS, SEGMENT_FLOATS)]);
    assert_eq!(&r.cache().buffer[..2 * SEGMENT_FLOATS], r.vertex_floats());
    assert_eq!(r.draw_calls(), &[draw(0, 2)]);
}

#[test]
fn completed_regions_are_never_overwritten() {
    let mut r = TestRenderer::default();
    let mut surface = RecordingSurface::ready();

    r.start_new_stroke(Color::red());
    r.append_many(line(3));
    r.render(&mut surface).unwrap();
    let first = r.vertex_floats().to_vec();

    r.start_new_stroke(Color::blue());
    r.append_many((0..5).map(|i| pt(0.0, i as f32 * 0.1)));
    r.render(&mut surface).unwrap();

    let a_len = 2 * SEGMENT_FLOATS;
    assert_eq!(r.active_start(), a_len);
    assert_eq!(&r.vertex_floats()[..a_len], first.as_slice());
    assert_eq!(&r.cache().buffer[..a_len], first.as_slice());
    assert_eq!(r.draw_calls(), &[draw(0, 2), draw(a_len * 4, 4)]);
    assert_eq!(color_of(&r.cache().buffer, a_len), Color::blue().to_array());
}

#[test]
fn strokes_started_between_renders_keep_their_offsets() {
    let mut r = TestRenderer::default();

    r.start_new_stroke(Color::red());
    r.append_many(line(2));
    r.start_new_stroke(Color::green());
    r.append_many(line(3));
    r.start_new_stroke(Color::blue());
    r.append_many(line(2));

    let completed = r.completed_strokes();
    assert_eq!(completed.len(), 2);
    assert_eq!((completed[0].float_start, completed[0].float_len), (0, SEGMENT_FLOATS));
    assert_eq!(
        (completed[1].float_start, completed[1].float_len),
        (SEGMENT_FLOATS, 2 * SEGMENT_FLOATS)
    );
    assert_eq!(r.active_start(), 3 * SEGMENT_FLOATS);

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();

    assert_eq!(
        r.draw_calls(),
        &[
            draw(0, 1),
            draw(SEGMENT_FLOATS * 4, 2),
            draw(3 * SEGMENT_FLOATS * 4, 1),
        ]
    );
    let buffer = &r.cache().buffer;
    assert_eq!(color_of(buffer, 0), Color::red().to_array());
    assert_eq!(color_of(buffer, SEGMENT_FLOATS), Color::green().to_array());
    assert_eq!(color_of(buffer, 3 * SEGMENT_FLOATS), Color::blue().to_array());
}

#[test]
fn page_overflow_reallocates_and_keeps_contents() {
    let mut r = TestRenderer::default();
    let mut surface = RecordingSurface::ready();

    r.append_many(line(3));
    r.render(&mut surface).unwrap();
    let initial_space = r.space();
    let prefix = r.vertex_floats().to_vec();

    // One page of f32 holds 1024 floats, about 21 segments.
    r.append_many((3..40).map(|i| pt(i as f32 * 0.1, 0.0)));
    r.render(&mut surface).unwrap();

    assert!(r.space() > initial_space);
    assert_eq!(r.space() % 1024, 0);
    assert_eq!(r.cache().allocations, 2);
    assert_eq!(r.cache().buffer.len(), r.space());
    assert_eq!(&r.cache().buffer[..prefix.len()], prefix.as_slice());
    assert_eq!(r.draw_calls(), &[draw(0, 39)]);
}

#[test]
fn append_while_idle_starts_default_stroke() {
    let config = StrokeConfig {
        default_color: Color::green(),
        ..StrokeConfig::default()
    };
    let mut r = TestRenderer::new(config);
    assert!(!r.is_drawing());

    r.append(Vertex::from_xyz(0.0, 0.0, 0.0, Color::red()));
    r.append(Vertex::from_xyz(1.0, 0.0, 0.0, Color::red()));

    let active = r.active_stroke().unwrap();
    assert_eq!(active.color(), Color::green());
    assert!(active.points().iter().all(|v| v.color == Color::green()));
    assert_eq!(r.stroke_count(), 1);
}

#[test]
fn finish_stroke_completes_and_discards_empty() {
    let mut r = TestRenderer::default();
    assert!(!r.finish_stroke());

    r.start_new_stroke(Color::red());
    assert!(r.finish_stroke());
    assert_eq!(r.stroke_count(), 0);

    r.start_new_stroke(Color::red());
    r.append_many(line(2));
    assert!(r.finish_stroke());
    assert!(!r.is_drawing());
    assert_eq!(r.completed_strokes().len(), 1);
    assert_eq!(r.completed_strokes()[0].vertex_count(), VERTICES_PER_SEGMENT);
    assert_eq!(r.active_start(), SEGMENT_FLOATS);

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();
    assert_eq!(r.draw_calls(), &[draw(0, 1)]);
}

#[test]
fn single_point_strokes_issue_no_draw() {
    let mut r = TestRenderer::default();
    r.append(pt(0.0, 0.0));

    let mut surface = RecordingSurface::ready();
    r.render(&mut surface).unwrap();
    assert!(r.draw_calls().is_empty());
    assert_eq!(surface.frames, vec![Vec::<DrawCall>::new()]);
}

#[test]
fn invalid_thickness_falls_back_to_default() {
    let mut r = TestRenderer::default();
    r.start_new_stroke_with_thickness(Color::red(), -1.0);
    assert_eq!(r.active_stroke().unwrap().thickness(), r.config().default_thickness);

    r.start_new_stroke_with_thickness(Color::red(), 0.1);
    assert_eq!(r.active_stroke().unwrap().thickness(), 0.1);
}

#[test]
fn queued_commands_apply_in_order() {
    let (tx, inbox) = stroke_channel();
    let producer = std::thread::spawn(move || {
        tx.start_stroke(Color::red()).unwrap();
        for v in line(3) {
            tx.append(v).unwrap();
        }
        tx.finish_stroke().unwrap();
        tx.start_stroke(Color::blue()).unwrap();
    });
    producer.join().unwrap();

    let mut r = TestRenderer::default();
    assert_eq!(r.drain(&inbox), 6);
    assert_eq!(r.completed_strokes().len(), 1);
    assert_eq!(r.completed_strokes()[0].stroke.color(), Color::red());
    assert_eq!(r.active_stroke().map(|s| s.color()), Some(Color::blue()));
    assert_eq!(r.drain(&inbox), 0);
}
