//! Music lookup
//!
//! Samples tracks from a local CSV export (Spotify tracks dataset layout) whose
//! `track_genre` column matches the music tags of the requested genres.

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
};

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::genre::Genre;

/// Hard ceiling on tracks returned by one lookup, whatever the settings say.
pub const MAX_TRACKS: usize = 10;

pub const REQUIRED_COLUMNS: [&str; 4] = ["track_name", "artists", "album_name", "track_genre"];

/// Errors that can occur while loading the dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset file not found: {0}")]
    Missing(PathBuf),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("failed to read dataset: {0}")]
    Unreadable(#[from] csv::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicSettings {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset.csv")
}

fn default_sample_size() -> usize {
    10
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            sample_size: default_sample_size(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    track_name: String,
    artists: String,
    album_name: String,
    track_genre: String,
}

/// A track as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRecord {
    pub track: String,
    pub artist: String,
    pub album: String,
}

impl TrackRecord {
    /// Placeholder shown when nothing matched.
    pub fn no_results() -> Self {
        Self {
            track: "No tracks found".to_string(),
            artist: "N/A".to_string(),
            album: "N/A".to_string(),
        }
    }

    /// Placeholder carrying a lookup failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            track: "Error".to_string(),
            artist: message.into(),
            album: "N/A".to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::no_results() || (self.track == "Error" && self.album == "N/A")
    }
}

#[derive(Debug, Clone)]
struct Track {
    record: TrackRecord,
    /// `track_genre`, trimmed and lowercased
    genre_key: String,
}

/// In-memory, read-only track table
#[derive(Debug, Clone)]
pub struct MusicDataset {
    tracks: Vec<Track>,
    skipped_rows: usize,
}

impl MusicDataset {
    /// Load the dataset from a CSV file; absence is reported distinctly.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::Missing(path.to_path_buf()));
        }

        let reader = csv_builder().from_path(path)?;
        let dataset = Self::from_csv(reader)?;

        tracing::info!(
            path = %path.display(),
            tracks = dataset.len(),
            skipped = dataset.skipped_rows,
            "[MUSIC] Dataset loaded"
        );

        Ok(dataset)
    }

    /// Load from any CSV source with a header row.
    pub fn from_reader<R: io::Read>(source: R) -> Result<Self, DatasetError> {
        Self::from_csv(csv_builder().from_reader(source))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DatasetError::MissingColumn(column));
            }
        }

        let mut tracks = Vec::new();
        let mut skipped_rows = 0;

        for row in reader.deserialize::<DatasetRow>() {
            match row {
                Ok(row) => tracks.push(Track {
                    genre_key: row.track_genre.trim().to_ascii_lowercase(),
                    record: TrackRecord {
                        track: row.track_name,
                        artist: row.artists,
                        album: row.album_name,
                    },
                }),
                Err(e) => {
                    skipped_rows += 1;
                    tracing::debug!("[MUSIC] Skipping malformed row: {}", e);
                }
            }
        }

        if skipped_rows > 0 {
            tracing::warn!("[MUSIC] Skipped {} malformed dataset rows", skipped_rows);
        }

        Ok(Self {
            tracks,
            skipped_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    fn matching<'a>(&'a self, tags: &'a HashSet<&str>) -> impl Iterator<Item = &'a TrackRecord> {
        self.tracks
            .iter()
            .filter(|t| tags.contains(t.genre_key.as_str()))
            .map(|t| &t.record)
    }
}

/// Headers are trimmed so validation and row deserialization see the same names.
fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true).trim(csv::Trim::Headers);
    builder
}

/// Outcome of a music lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicOutcome {
    Tracks(Vec<TrackRecord>),
    NoMatches,
    /// The lookup could not run at all
    Failed(String),
}

impl MusicOutcome {
    /// Rows for display: the sample, or exactly one sentinel record.
    pub fn into_records(self) -> Vec<TrackRecord> {
        match self {
            MusicOutcome::Tracks(tracks) => tracks,
            MusicOutcome::NoMatches => vec![TrackRecord::no_results()],
            MusicOutcome::Failed(reason) => vec![TrackRecord::error(reason)],
        }
    }
}

/// Distinct music tags for the requested genres, in request order.
pub fn music_tags(genres: &[Genre]) -> Vec<&'static str> {
    let mut tags = Vec::new();
    for genre in genres {
        let tag = genre.music_category();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Random sample of up to `sample_size` (at most [`MAX_TRACKS`]) tracks matching the genres.
pub fn lookup(dataset: &MusicDataset, genres: &[Genre], sample_size: usize) -> MusicOutcome {
    lookup_with_rng(dataset, genres, sample_size, &mut rand::thread_rng())
}

pub fn lookup_with_rng<R: Rng + ?Sized>(
    dataset: &MusicDataset,
    genres: &[Genre],
    sample_size: usize,
    rng: &mut R,
) -> MusicOutcome {
    if dataset.is_empty() {
        tracing::warn!("[MUSIC] Dataset has no usable rows");
        return MusicOutcome::Failed("dataset contains no usable rows".to_string());
    }
    if sample_size == 0 {
        return MusicOutcome::Failed("sample size must be at least 1".to_string());
    }

    let tags: HashSet<&str> = music_tags(genres).into_iter().collect();
    let matches: Vec<&TrackRecord> = dataset.matching(&tags).collect();

    tracing::debug!(
        tags = ?tags,
        matches = matches.len(),
        "[MUSIC] Filtered dataset"
    );

    if matches.is_empty() {
        return MusicOutcome::NoMatches;
    }

    let sample = matches
        .choose_multiple(rng, sample_size.min(MAX_TRACKS).min(matches.len()))
        .map(|record| (*record).clone())
        .collect();

    MusicOutcome::Tracks(sample)
}
