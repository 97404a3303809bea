mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::StereographApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::discover();
    log::info!("Looking for default images in {}", config.asset_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Stereograph Generator")
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Stereograph Generator",
        options,
        Box::new(|cc| Ok(Box::new(StereographApp::new(cc, config)))),
    )
}
