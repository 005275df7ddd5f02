use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config, Collaborators, DrawingSurface, RasterSurface, SpriteImage, StoryClient, WidgetEvent,
};
use shared::domain::{is_blank, Rect, SurfaceSize};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storygen", about = "Generate, narrate and animate short stories")]
struct Args {
    /// Settings file; defaults to ./storygen.toml, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a story from a prompt and print it.
    Story {
        #[arg(long)]
        prompt: String,
        /// Also read the story aloud.
        #[arg(long)]
        narrate: bool,
    },
    /// Play the sprite slide and write frames as PNG files.
    Animate {
        #[arg(long)]
        out_dir: PathBuf,
        /// Keep every n-th frame.
        #[arg(long, default_value_t = 10)]
        every: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let settings = config::load_settings(args.config.as_deref());
    settings.validate().context("invalid settings")?;

    match args.command {
        Command::Story { prompt, narrate } => {
            if is_blank(&prompt) {
                bail!("prompt must not be blank");
            }
            let surface = Arc::new(RasterSurface::default());
            let client = StoryClient::new(Collaborators::from_settings(&settings, surface));
            client.set_prompt(prompt).await;
            let story = client
                .generate_story()
                .await
                .context("story request was not started")?;
            println!("{story}");
            if narrate {
                client.narrate().await;
            }
        }
        Command::Animate { out_dir, every } => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;
            let surface = Arc::new(FrameDumpSurface::new(out_dir, every));
            let client = StoryClient::new(Collaborators::from_settings(&settings, surface.clone()));
            let mut events = client.subscribe_events();
            client.play_animation().await;

            loop {
                match events.recv().await {
                    Ok(WidgetEvent::AnimationFinished { frames }) => {
                        println!(
                            "animation finished: {frames} frames, {} written",
                            surface.written.load(Ordering::Relaxed)
                        );
                        break;
                    }
                    Ok(WidgetEvent::AnimationFailed(reason)) => bail!("animation failed: {reason}"),
                    Ok(_) | Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => bail!("animation events closed unexpectedly"),
                }
            }
        }
    }

    Ok(())
}

/// Raster surface that writes every n-th drawn frame to `<dir>/frame_NNNN.png`.
struct FrameDumpSurface {
    raster: RasterSurface,
    dir: PathBuf,
    every: u32,
    drawn: AtomicU32,
    written: AtomicU32,
}

impl FrameDumpSurface {
    fn new(dir: PathBuf, every: u32) -> Self {
        Self {
            raster: RasterSurface::default(),
            dir,
            every: every.max(1),
            drawn: AtomicU32::new(0),
            written: AtomicU32::new(0),
        }
    }

    fn save(&self, index: u32) {
        let path = frame_path(&self.dir, index);
        match self.raster.snapshot().save(&path) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => tracing::warn!("failed to write {}: {err}", path.display()),
        }
    }
}

impl DrawingSurface for FrameDumpSurface {
    fn size(&self) -> SurfaceSize {
        self.raster.size()
    }

    fn clear_rect(&self, rect: Rect) {
        self.raster.clear_rect(rect);
    }

    fn draw_image(&self, sprite: &SpriteImage, rect: Rect) {
        self.raster.draw_image(sprite, rect);
        let index = self.drawn.fetch_add(1, Ordering::Relaxed);
        if index % self.every == 0 {
            self.save(index);
        }
    }
}

fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:04}.png"))
}
