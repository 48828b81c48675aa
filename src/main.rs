//! ScriptShot - share HTML/CSS snippets and block-built layouts
//!
//! A native client with a feed, a code composer, a drag-and-drop block
//! editor and thumbnail generation for block posts.

mod app;
mod backend;
mod core;
mod tasks;
mod ui;

use app::ScriptShotApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting ScriptShot...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("ScriptShot"),
        ..Default::default()
    };

    eframe::run_native(
        "ScriptShot",
        native_options,
        Box::new(|cc| Ok(Box::new(ScriptShotApp::new(cc)?))),
    )
}
