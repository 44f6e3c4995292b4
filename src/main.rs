mod app;
mod color;
mod data;
mod pipeline;
mod state;
mod ui;

use std::path::Path;

use app::GovScopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional preload: govscope <observations> [country_reference.csv]
    let mut app = GovScopeApp::default();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(obs_path) = args.first() {
        let reference = args.get(1).map(Path::new);
        match data::loader::load_dataset(Path::new(obs_path), reference) {
            Ok(dataset) => {
                log::info!("Preloaded {} observations from {obs_path}", dataset.len());
                app.state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {obs_path}: {e:#}");
                app.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GovScope – Governance Indicators",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
