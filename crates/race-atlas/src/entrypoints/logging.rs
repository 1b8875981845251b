//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise a default filter keeps eframe and egui
//! internals quiet while showing our own debug output in debug builds.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER_DEBUG: &str =
    "debug,eframe::native=warn,egui::context=warn,egui_wgpu=info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

const DEFAULT_FILTER_RELEASE: &str = "info,eframe::native=warn,egui::context=warn";

/// Install the global `fmt` subscriber. Must run before any logging.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cfg!(debug_assertions) {
            DEFAULT_FILTER_DEBUG
        } else {
            DEFAULT_FILTER_RELEASE
        })
    });

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::warn!("A global tracing subscriber was already installed");
    }
}
