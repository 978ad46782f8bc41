//! Non-interactive `config` subcommand

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::{
    config::{API_KEY_ENV, Config},
    output::OutputHandler,
};

const KEYS: [(&str, &[&str]); 5] = [
    ("gemini", &["base_url", "model", "timeout_secs"]),
    (
        "movies",
        &["search_url", "user_agent", "timeout_secs", "per_genre_limit", "max_results"],
    ),
    ("music", &["dataset_path", "sample_size"]),
    ("dispatch", &["job_delay_ms"]),
    ("display", &["color"]),
];

/// Show current configuration
pub fn show_config(config: &Config, path: &Path) {
    let output = OutputHandler::new(config.display.color);

    output.print_header("Configuration");

    for (section, keys) in KEYS {
        println!();
        println!("  {}", format!("[{}]", section).bright_cyan());
        for key in keys {
            let value = config
                .get(&format!("{}.{}", section, key))
                .unwrap_or_default();
            println!("    {} = \"{}\"", key.dimmed(), value);
        }
    }

    println!();
    println!(
        "  {} {}",
        format!("{}:", API_KEY_ENV).dimmed(),
        if Config::api_key().is_some() {
            "set".bright_green().to_string()
        } else {
            "not set".dimmed().to_string()
        }
    );
    println!("  {} {}", "Config file:".dimmed(), path.display());
}

/// Set a configuration value and persist it
pub fn set_config(path: &Path, kv: &str) -> Result<()> {
    let output = OutputHandler::new(true);

    let Some((key, value)) = kv.split_once('=') else {
        output.print_error("Invalid format. Use: key=value");
        return Ok(());
    };

    let key = key.trim();
    let value = value.trim().trim_matches('"');

    let mut config = Config::load(path)?;
    match config.set(key, value) {
        Ok(()) => {
            config.save(path)?;
            output.print_success(&format!("Set {} = \"{}\"", key, value));
        }
        Err(e) => {
            output.print_error(&format!("Failed to set config: {}", e));
        }
    }

    Ok(())
}
