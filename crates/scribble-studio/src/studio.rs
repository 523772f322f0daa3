use glam::{Vec2, Vec3};

use scribble_engine::core::{App, AppControl, FrameCtx};
use scribble_engine::geom::{Camera, Color, Vertex};
use scribble_engine::input::{Key, MouseButton};
use scribble_engine::render::strokes::{
    stroke_channel, StrokeInbox, StrokeRenderError, StrokeRenderer, StrokeSender,
    WgpuStrokeSurface,
};
use scribble_engine::window::CursorIcon;

const CLEAR: Color = Color::new(0.96, 0.95, 0.92, 1.0);

/// Radians per second while an arrow key is held.
const ORBIT_SPEED: f32 = 1.2;

const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 5.0;

fn palette() -> [Color; 9] {
    [
        Color::black(),
        Color::from_srgb_u8(0xe6, 0x39, 0x46, 0xff),
        Color::from_srgb_u8(0xf4, 0xa2, 0x61, 0xff),
        Color::from_srgb_u8(0xe9, 0xc4, 0x6a, 0xff),
        Color::from_srgb_u8(0x2a, 0x9d, 0x8f, 0xff),
        Color::from_srgb_u8(0x26, 0x46, 0x53, 0xff),
        Color::from_srgb_u8(0x45, 0x7b, 0x9d, 0xff),
        Color::from_srgb_u8(0x8e, 0x44, 0xad, 0xff),
        Color::white(),
    ]
}

pub struct Studio {
    renderer: StrokeRenderer,
    camera: Camera,
    color: Color,

    /// Distance of the drawing plane from the eye along the view axis.
    distance: f32,

    tx: StrokeSender,
    inbox: StrokeInbox,

    /// The active stroke was started by the mouse. Queued and mouse strokes never
    /// share the active slot: presses are ignored while a queued stroke draws, and
    /// the queue is held while the mouse draws.
    mouse_stroke: bool,

    last_error: Option<StrokeRenderError>,
}

impl Studio {
    pub fn new() -> Self {
        let (tx, inbox) = stroke_channel();
        Self {
            renderer: StrokeRenderer::default(),
            camera: Camera::default(),
            color: Color::black(),
            distance: 0.5,
            tx,
            inbox,
            mouse_stroke: false,
            last_error: None,
        }
    }

    /// Sender for strokes produced outside the frame callback.
    pub fn sender(&self) -> StrokeSender {
        self.tx.clone()
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let frame = ctx.input_frame;

        if frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if let Some(index) = frame.keys_pressed.iter().find_map(|k| k.digit_index()) {
            self.color = palette()[index];
            log::debug!("color {} selected", index + 1);
        }

        let step = ORBIT_SPEED * ctx.time.dt;
        let input = ctx.input;
        let axis = |pos: Key, neg: Key| f32::from(input.key_down(pos)) - f32::from(input.key_down(neg));
        let yaw = step * axis(Key::ArrowLeft, Key::ArrowRight);
        let pitch = step * axis(Key::ArrowUp, Key::ArrowDown);
        if yaw != 0.0 || pitch != 0.0 {
            self.camera.orbit(yaw, pitch);
        }

        if frame.scroll_lines != 0.0 {
            self.distance = (self.distance * 1.1f32.powf(-frame.scroll_lines))
                .clamp(MIN_DISTANCE, MAX_DISTANCE);
        }

        AppControl::Continue
    }

    /// Applies queued stroke commands unless a mouse stroke is in progress.
    fn drain_queue(&mut self) {
        if self.mouse_stroke {
            return;
        }
        let applied = self.renderer.drain(&self.inbox);
        if applied > 0 {
            log::trace!("applied {applied} queued stroke commands");
        }
    }

    /// Left button: press starts a stroke, every held frame appends the cursor
    /// projected onto the drawing plane, release finishes.
    fn handle_pointer(&mut self, ctx: &FrameCtx<'_, '_>) {
        let frame = ctx.input_frame;

        if frame.button_pressed(MouseButton::Left) {
            self.pointer_pressed();
        }

        if ctx.input.button_down(MouseButton::Left) {
            if let Some((x, y)) = ctx.input.pointer_pos {
                let p = self
                    .camera
                    .unproject(Vec2::new(x, y), ctx.window.viewport(), self.distance);
                self.pointer_dragged(p);
            }
        }

        if frame.button_released(MouseButton::Left) {
            self.pointer_released();
        }
    }

    fn pointer_pressed(&mut self) {
        if self.renderer.is_drawing() && !self.mouse_stroke {
            log::debug!("queued stroke in progress; press ignored");
            return;
        }
        self.renderer.start_new_stroke(self.color);
        self.mouse_stroke = true;
    }

    fn pointer_dragged(&mut self, p: Vec3) {
        if self.mouse_stroke {
            self.renderer.append(Vertex::new(p, self.color));
        }
    }

    fn pointer_released(&mut self) {
        if self.mouse_stroke {
            self.renderer.finish_stroke();
            self.mouse_stroke = false;
        }
    }

    fn report(&mut self, result: Result<(), StrokeRenderError>) {
        let err = result.err();
        if err == self.last_error {
            return;
        }

        match &err {
            None => log::debug!("stroke rendering resumed"),
            Some(e) if e.is_skip_frame() => log::debug!("skipping stroke frame: {e}"),
            Some(e) => log::warn!("{e}"),
        }
        self.last_error = err;
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        self.drain_queue();
        self.handle_pointer(ctx);

        ctx.window.set_cursor(CursorIcon::Crosshair);

        let renderer = &mut self.renderer;
        let mut result = Ok(());
        let control = ctx.render(CLEAR, self.camera, |rctx, target| {
            let mut surface = WgpuStrokeSurface::new(rctx, target);
            result = renderer.render(&mut surface);
        });

        self.report(result);
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32) -> Vertex {
        Vertex::from_xyz(x, 0.0, 0.0, Color::red())
    }

    #[test]
    fn press_during_queued_stroke_is_ignored() {
        let mut studio = Studio::new();
        let tx = studio.sender();
        tx.start_stroke(Color::red()).unwrap();
        tx.append(sample(0.0)).unwrap();
        studio.drain_queue();

        studio.pointer_pressed();
        studio.pointer_dragged(Vec3::new(1.0, 1.0, 1.0));
        studio.pointer_released();

        tx.append(sample(0.1)).unwrap();
        studio.drain_queue();

        let active = studio.renderer.active_stroke().unwrap();
        assert_eq!(active.color(), Color::red());
        assert_eq!(active.len(), 2);
        assert!(studio.renderer.completed_strokes().is_empty());
    }

    #[test]
    fn queued_stroke_waits_for_mouse_release() {
        let mut studio = Studio::new();
        let tx = studio.sender();

        studio.pointer_pressed();
        studio.pointer_dragged(Vec3::ZERO);

        tx.start_stroke(Color::red()).unwrap();
        tx.append(sample(0.0)).unwrap();
        studio.drain_queue();

        studio.pointer_dragged(Vec3::X);
        studio.pointer_released();

        let completed = studio.renderer.completed_strokes();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].stroke.color(), Color::black());
        assert_eq!(completed[0].stroke.len(), 2);

        studio.drain_queue();
        let active = studio.renderer.active_stroke().unwrap();
        assert_eq!(active.color(), Color::red());
        assert_eq!(active.len(), 1);
    }
}
