//! Configuration management for the vibe CLI
//!
//! Loads settings from ~/.vibe/config.toml (or an explicit path). The Gemini API key is never part
//! of this file; it is read from the environment at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recommend::{GeminiSettings, MAX_TITLES, MAX_TRACKS, MovieSettings, MusicSettings};
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the vibe CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub movies: MovieSettings,

    #[serde(default)]
    pub music: MusicSettings,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Pause before each lookup job, in milliseconds
    #[serde(default = "default_job_delay_ms")]
    pub job_delay_ms: u64,
}

fn default_job_delay_ms() -> u64 {
    500
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            job_delay_ms: default_job_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vibe")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.clamp_limits();

        Ok(config)
    }

    /// Pull result limits from a hand-edited file back within what the lookups return.
    fn clamp_limits(&mut self) {
        let limits = [
            ("movies.per_genre_limit", &mut self.movies.per_genre_limit, MAX_TITLES),
            ("movies.max_results", &mut self.movies.max_results, MAX_TITLES),
            ("music.sample_size", &mut self.music.sample_size, MAX_TRACKS),
        ];

        for (key, value, max) in limits {
            if *value > max {
                tracing::warn!("{} = {} exceeds {}, using {}", key, value, max, max);
                *value = max;
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// The API key from the environment, if set
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Get a configuration value by key path (e.g., "movies.max_results")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["gemini", "base_url"] => Some(self.gemini.base_url.clone()),
            ["gemini", "model"] => Some(self.gemini.model.clone()),
            ["gemini", "timeout_secs"] => Some(self.gemini.timeout_secs.to_string()),
            ["movies", "search_url"] => Some(self.movies.search_url.clone()),
            ["movies", "user_agent"] => Some(self.movies.user_agent.clone()),
            ["movies", "timeout_secs"] => Some(self.movies.timeout_secs.to_string()),
            ["movies", "per_genre_limit"] => Some(self.movies.per_genre_limit.to_string()),
            ["movies", "max_results"] => Some(self.movies.max_results.to_string()),
            ["music", "dataset_path"] => Some(self.music.dataset_path.display().to_string()),
            ["music", "sample_size"] => Some(self.music.sample_size.to_string()),
            ["dispatch", "job_delay_ms"] => Some(self.dispatch.job_delay_ms.to_string()),
            ["display", "color"] => Some(self.display.color.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["gemini", "base_url"] => self.gemini.base_url = value.to_string(),
            ["gemini", "model"] => self.gemini.model = value.to_string(),
            ["gemini", "timeout_secs"] => self.gemini.timeout_secs = parse_value(key, value)?,
            ["movies", "search_url"] => self.movies.search_url = value.to_string(),
            ["movies", "user_agent"] => self.movies.user_agent = value.to_string(),
            ["movies", "timeout_secs"] => self.movies.timeout_secs = parse_value(key, value)?,
            ["movies", "per_genre_limit"] => {
                self.movies.per_genre_limit = parse_limit(key, value, MAX_TITLES)?
            }
            ["movies", "max_results"] => {
                self.movies.max_results = parse_limit(key, value, MAX_TITLES)?
            }
            ["music", "dataset_path"] => self.music.dataset_path = PathBuf::from(value),
            ["music", "sample_size"] => {
                self.music.sample_size = parse_limit(key, value, MAX_TRACKS)?
            }
            ["dispatch", "job_delay_ms"] => self.dispatch.job_delay_ms = parse_value(key, value)?,
            ["display", "color"] => self.display.color = parse_value(key, value)?,
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: {}", key, value))
}

fn parse_limit(key: &str, value: &str, max: usize) -> Result<usize> {
    let limit: usize = parse_value(key, value)?;
    if limit > max {
        anyhow::bail!("{} must be at most {}, got {}", key, max, limit);
    }
    Ok(limit)
}
