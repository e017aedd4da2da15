// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! deepink - freehand annotation for deep-zoom images
//!
//! A cross-platform desktop application for drawing on very large images
//! while panning and zooming.

use anyhow::Result;
use clap::Parser;
use deepink::app::{DeepinkApp, LaunchOptions};
use deepink::config::AppConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "deepink", version, about = "Freehand annotation of deep-zoom images")]
struct Args {
    /// Image to open on startup
    image: Option<PathBuf>,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Annotation project to load (.yaml, .yml or .json)
    #[arg(long, value_name = "FILE")]
    annotations: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    log::debug!("Using {config:?}");

    let launch = LaunchOptions {
        image: args.image,
        annotations: args.annotations,
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("deepink"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "deepink",
        options,
        Box::new(move |cc| Ok(Box::new(DeepinkApp::new(cc, config, launch)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
