//! Movie lookup
//!
//! Scrapes titles from the IMDb advanced-search results page, one request per genre.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::genre::Genre;

/// Hard ceiling on titles returned by one lookup, whatever the settings say.
pub const MAX_TITLES: usize = 10;

static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("ordinal prefix pattern is valid"));

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.ipc-title-link-wrapper").expect("title link selector is valid")
});

static TITLE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.ipc-title__text").expect("title text selector is valid"));

/// Errors that can occur while fetching a results page
#[derive(Debug, thiserror::Error)]
pub enum MovieError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSettings {
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Titles taken from each genre's page
    #[serde(default = "default_per_genre_limit")]
    pub per_genre_limit: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_search_url() -> String {
    "https://www.imdb.com/search/title/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_per_genre_limit() -> usize {
    5
}

fn default_max_results() -> usize {
    10
}

impl Default for MovieSettings {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            per_genre_limit: default_per_genre_limit(),
            max_results: default_max_results(),
        }
    }
}

/// A genre whose page could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreFailure {
    pub genre: Genre,
    pub reason: String,
}

/// Result of a multi-genre movie lookup
#[derive(Debug, Clone, Default)]
pub struct MovieReport {
    /// Deduplicated titles in discovery order
    pub titles: Vec<String>,
    pub failures: Vec<GenreFailure>,
}

impl MovieReport {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Movie title scraper
pub struct MovieLookup {
    client: Client,
    settings: MovieSettings,
}

impl MovieLookup {
    pub fn new(settings: MovieSettings) -> Result<Self, MovieError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    /// Fetch one genre's results page and return every title on it.
    pub async fn fetch_titles(&self, genre: Genre) -> Result<Vec<String>, MovieError> {
        tracing::debug!(genre = %genre, "[IMDB] Fetching search page");

        let html = self
            .client
            .get(&self.settings.search_url)
            .query(&[("title_type", "feature"), ("genres", genre.movie_category())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_titles(&html))
    }

    /// Titles for all genres: per-genre cap, global dedup, overall cap (never above
    /// [`MAX_TITLES`]).
    ///
    /// A failing genre contributes nothing and is recorded in the report.
    pub async fn lookup(&self, genres: &[Genre]) -> MovieReport {
        let mut report = MovieReport::default();
        let max_results = self.settings.max_results.min(MAX_TITLES);
        let per_genre = self.settings.per_genre_limit.min(MAX_TITLES);

        for &genre in genres {
            match self.fetch_titles(genre).await {
                Ok(titles) => {
                    for title in titles.into_iter().take(per_genre) {
                        if !report.titles.contains(&title) {
                            report.titles.push(title);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("[IMDB] {}: {}", genre, e);
                    report.failures.push(GenreFailure {
                        genre,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.titles.truncate(max_results);
        report
    }
}

/// Strip surrounding whitespace and a leading `N.` ordinal.
pub fn clean_title(raw: &str) -> String {
    ORDINAL_PREFIX.replace(raw.trim(), "").trim().to_string()
}

/// Extract titles from a results page, in page order.
pub fn parse_titles(html: &str) -> Vec<String> {
    Html::parse_document(html)
        .select(&TITLE_LINK)
        .filter_map(|link| link.select(&TITLE_TEXT).next())
        .map(|h3| clean_title(&h3.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .collect()
}
