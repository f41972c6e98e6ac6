//! Kinetic CLI
//!
//! Headless preview of the motion hooks on a fixed frame clock.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinetic_motion::MotionConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod presets;
mod preview;

use preview::{HookKind, PreviewOptions, Transition};

#[derive(Parser)]
#[command(name = "kinetic")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kinetic motion preview", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a hook and print its values frame by frame
    Preview {
        /// Hook to preview
        #[arg(value_enum)]
        hook: HookKind,

        /// Frames per second of the simulated clock
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,

        /// Simulated time to run; each hook has its own default
        #[arg(short, long, value_parser = preview::parse_duration_ms)]
        duration_ms: Option<f32>,

        /// Print every Nth frame
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        every: u32,

        /// Motion config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit JSON lines instead of text rows
        #[arg(long)]
        json: bool,

        /// Transition to run for the declarative hook
        #[arg(short, long, value_enum, default_value_t = Transition::FadeIn)]
        transition: Transition,
    },

    /// Show the preset table
    Presets {
        /// Motion config (TOML) whose `[presets]` defaults are marked
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Preview {
            hook,
            fps,
            duration_ms,
            every,
            config,
            json,
            transition,
        } => {
            let config = load_config(config.as_deref())?;
            preview::run(
                &config,
                PreviewOptions {
                    hook,
                    fps,
                    duration_ms,
                    every,
                    json,
                    transition,
                },
            )
        }

        Commands::Presets { config } => {
            let config = load_config(config.as_deref())?;
            presets::print(&config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<MotionConfig> {
    match path {
        Some(path) => MotionConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(MotionConfig::default()),
    }
}
