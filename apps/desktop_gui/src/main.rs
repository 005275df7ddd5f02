use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{config, RasterSurface};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::StoryGeneratorApp;

const APP_TITLE: &str = "Free Story & Animation Generator";

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./storygen.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let settings = config::load_settings(args.config.as_deref());
    settings.validate().context("invalid settings")?;

    let surface = Arc::new(RasterSurface::default());
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, Arc::clone(&surface), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(StoryGeneratorApp::new(cmd_tx, ui_rx, surface)))),
    )
    .map_err(|err| anyhow!("desktop UI failed: {err}"))
}
