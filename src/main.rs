mod app;
mod cli;
mod color;
mod config;
mod data;
mod geo;
mod state;
mod ui;

use anyhow::{Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::HotelDashboardApp;
use cli::Args;
use config::Config;
use state::AppState;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let config = Config::resolve(&args)?;
    log::debug!("Configuration: {config:?}");

    // Load failures are fatal: there is nothing to show without the data.
    let dataset = data::loader::load_file(&config.data.path, &config.load_options()?)?;
    let state = AppState::new(dataset, config.data.path.clone(), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hotel Booking Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so the sidebar logo can be a png file.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(HotelDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("window closed with an error: {e}"))
}
