use super::logging::setup_logging;
use crate::{APP_NAME, RaceAtlasApp};

/// Log the crate version once at startup
pub fn log_version_info() {
    tracing::info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

/// Run the application on native (desktop) platforms.
///
/// The tokio runtime must be live while eframe runs: the startup data load is
/// spawned onto it from inside the app.
pub fn run_native() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();
    log_version_info();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        native_main(APP_NAME, |cc| Box::new(RaceAtlasApp::new(cc))).await
    })?;

    Ok(())
}

async fn native_main(
    app_name: &str,
    app_creator: impl FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>,
) -> eframe::Result {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title(app_name),
        ..Default::default()
    };

    eframe::run_native(
        app_name,
        native_options,
        Box::new(move |cc| Ok(app_creator(cc))),
    )
}
