mod demo;
mod studio;

use anyhow::Result;
use winit::dpi::LogicalSize;

use scribble_engine::device::GpuInit;
use scribble_engine::logging::{init_logging, LoggingConfig};
use scribble_engine::window::{Runtime, RuntimeConfig};

use studio::Studio;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut studio = Studio::new();
    if std::env::args().skip(1).any(|a| a == "--demo") {
        demo::spawn_helix(studio.sender());
    }

    log::info!(
        "left mouse draws, 1-9 pick color, arrows orbit, wheel moves the drawing plane, esc quits"
    );

    let config = RuntimeConfig {
        title: "Scribble Studio".to_string(),
        initial_size: LogicalSize::new(1280.0, 800.0),
    };
    Runtime::run(config, GpuInit::default(), studio)
}
