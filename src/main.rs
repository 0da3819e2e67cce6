// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! VIDCROP - visual video cropping
//!
//! A desktop application for selecting a rectangular region over a video
//! frame and exporting exactly that region at the video's native resolution.

mod app;
mod config;
mod error;
mod interaction;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::VidcropApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([640.0, 480.0])
            .with_title("VIDCROP - Video Crop Tool"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "VIDCROP",
        options,
        Box::new(|_cc| Ok(Box::new(VidcropApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
