pub mod classifier;
pub mod genre;
pub mod movies;
pub mod music;
pub mod relations;

pub use classifier::{ClassifierError, GeminiClassifier, GeminiSettings, VibeClassifier};
pub use genre::{Genre, genre_list, parse_manual_selection, validate_labels};
pub use movies::{MAX_TITLES, MovieError, MovieLookup, MovieReport, MovieSettings};
pub use music::{
    DatasetError, MAX_TRACKS, MusicDataset, MusicOutcome, MusicSettings, TrackRecord,
};
pub use relations::related_genres;
