use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use glam::Vec3;
use scribble_engine::geom::{Color, Vertex};
use scribble_engine::render::strokes::StrokeSender;

const TURNS: f32 = 3.0;
const SAMPLES: usize = 240;

/// Draws a three-turn helix from a worker thread, one sample every few ms, the
/// way a remote peer would stream a stroke in.
pub fn spawn_helix(tx: StrokeSender) {
    thread::spawn(move || {
        let color = Color::from_srgb_u8(0x2a, 0x9d, 0x8f, 0xff);
        if tx.start_stroke(color).is_err() {
            return;
        }

        for i in 0..SAMPLES {
            let t = i as f32 / (SAMPLES - 1) as f32;
            let angle = t * TURNS * TAU;
            let p = Vec3::new(0.15 * angle.cos(), -0.2 + 0.4 * t, 0.15 * angle.sin());

            if tx.append(Vertex::new(p, color)).is_err() {
                log::debug!("studio closed; helix stopped at sample {i}");
                return;
            }
            thread::sleep(Duration::from_millis(8));
        }

        let _ = tx.finish_stroke();
        log::info!("helix complete");
    });
}
