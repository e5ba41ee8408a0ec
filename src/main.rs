mod engine;
mod model;
mod ui;

use std::sync::Arc;

use eframe::egui;

use crate::model::story::StoryGraph;

fn main() -> eframe::Result<()> {
    // Control verbosity with RUST_LOG:
    //   RUST_LOG=info   cargo run   # node transitions + request lifecycle
    //   RUST_LOG=debug  cargo run   # + parsed labels and routing decisions
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // The API key is only needed at generation time; a missing .env must not
    // block loading or navigating authored nodes.
    let _ = dotenvy::dotenv();

    let story_path = model::story::default_story_path();
    let graph = match StoryGraph::load(&story_path) {
        Ok(graph) => Arc::new(graph),
        Err(e) => {
            eprintln!("Story load error: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Enter the Forest",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::StoryApp::new(graph)))),
    )
}
