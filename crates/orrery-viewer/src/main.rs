//! Orrery viewer: an animated miniature solar system with a debug panel.

use anyhow::Result;

use orrery_engine::device::GpuInit;
use orrery_engine::logging;
use orrery_engine::window::{Runtime, RuntimeConfig};

mod app;
mod gui;
mod panel;

fn main() -> Result<()> {
    logging::init_logging(None);

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        app::ViewerApp::new(),
    )
}
