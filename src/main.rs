mod app;
mod color;
mod config;
mod data;
mod state;
mod theme;
mod ui;

use app::SalaryDashApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // The dataset is loaded once, before any window exists; there is no
    // dashboard without it.
    let state = match data::loader::load_file(&config.data).and_then(AppState::new) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", config.data.display());
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 1000.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Science Salaries Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(SalaryDashApp::new(cc, state)))),
    )
}
