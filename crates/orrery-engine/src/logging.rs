//! Logger bootstrap.
//!
//! Thin wrapper over `env_logger` so the binary has a single call site.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter resolution order: explicit `filter` argument, then `RUST_LOG`,
/// then `info`. Subsequent calls are ignored, so tests and the binary can
/// both call this safely.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
