//! Vibe CLI - mood-driven movie and music recommendations
//!
//! Describe a vibe in plain words (or pick genres by hand) and get movie titles from IMDb search
//! plus a sample of tracks from a local Spotify-style dataset.

mod commands;
mod config;
mod output;
mod repl;

#[cfg(test)]
mod repl_tests;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recommend::{GeminiClassifier, MovieLookup, MusicDataset};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Config,
    output::OutputHandler,
    repl::{TerminalInput, VibeRepl},
};

/// Vibe CLI - mood-driven recommendations
#[derive(Parser)]
#[command(name = "vibe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn a mood into movie and music recommendations")]
#[command(long_about = r#"
Vibe turns a free-text mood into genres and recommends movies and music for them.

Set GEMINI_API_KEY to enable vibe analysis; without it, use 'manual' at the prompt
to choose genres yourself.

Examples:
  vibe                              # Start an interactive session
  vibe --dataset ~/data/tracks.csv  # Use a specific music dataset
  vibe config --show                # Show the resolved configuration
"#)]
struct Cli {
    /// Path to the config file (defaults to ~/.vibe/config.toml)
    #[arg(short, long, env = "VIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the music dataset CSV
    #[arg(short, long, env = "VIBE_DATASET")]
    dataset: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("vibe_cli={0},recommend={0},warn", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;

    if let Some(dataset) = cli.dataset {
        config.music.dataset_path = dataset;
    }

    if let Some(Commands::Config { show, set }) = cli.command {
        match set {
            Some(kv) if !show => commands::set_config(&config_path, &kv)?,
            _ => commands::show_config(&config, &config_path),
        }
        return Ok(());
    }

    let output = OutputHandler::new(config.display.color);

    let dataset = MusicDataset::load(&config.music.dataset_path)
        .context("Could not load the music dataset")?;
    let classifier = GeminiClassifier::new(config.gemini.clone(), Config::api_key())?;
    let movies = MovieLookup::new(config.movies.clone())?;

    let mut repl = VibeRepl::new(
        TerminalInput::new()?,
        Box::new(classifier),
        movies,
        dataset,
        config.music.sample_size,
        Duration::from_millis(config.dispatch.job_delay_ms),
        output,
    );
    repl.run().await
}
