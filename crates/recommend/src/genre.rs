//! Genre taxonomy
//!
//! The closed set of genres shared by the classifier, the manual picker and both lookups,
//! plus the fixed mappings into each external source's vocabulary.

use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// One of the fixed genre labels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    Crime,
    Romance,
    Thriller,
    Adventure,
    #[strum(to_string = "Sci-Fi")]
    SciFi,
    Fantasy,
    Musical,
    Documentary,
    Mystery,
    Animation,
    Family,
    War,
    Western,
    Sport,
    Biography,
}

impl Genre {
    /// All genres in canonical order.
    pub fn all() -> impl Iterator<Item = Genre> {
        Genre::iter()
    }

    /// Canonical label, e.g. `"Sci-Fi"`.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Category string understood by the movie search page.
    pub fn movie_category(self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Horror => "horror",
            Genre::Crime => "crime",
            Genre::Romance => "romance",
            Genre::Thriller => "thriller",
            Genre::Adventure => "adventure",
            Genre::SciFi => "sci-fi",
            Genre::Fantasy => "fantasy",
            Genre::Musical => "musical",
            Genre::Documentary => "documentary",
            Genre::Mystery => "mystery",
            Genre::Animation => "animation",
            Genre::Family => "family",
            Genre::War => "war",
            Genre::Western => "western",
            Genre::Sport => "sport",
            Genre::Biography => "biography",
        }
    }

    /// Value of the dataset's `track_genre` column this genre maps to.
    pub fn music_category(self) -> &'static str {
        match self {
            Genre::Action => "rock",
            Genre::Comedy | Genre::Family => "pop",
            Genre::Drama => "blues",
            Genre::Horror => "metal",
            Genre::Crime => "hip-hop",
            Genre::Romance => "jazz",
            Genre::Thriller => "electronic",
            Genre::Adventure => "folk",
            Genre::SciFi => "ambient",
            Genre::Fantasy => "classical",
            Genre::Musical => "show-tunes",
            Genre::Documentary => "acoustic",
            Genre::Mystery => "trip-hop",
            Genre::Animation => "children",
            Genre::War => "industrial",
            Genre::Western => "country",
            Genre::Sport => "edm",
            Genre::Biography => "singer-songwriter",
        }
    }

    /// Look up a label case-insensitively, ignoring surrounding whitespace.
    pub fn parse_label(label: &str) -> Option<Genre> {
        label.trim().parse().ok()
    }
}

/// Comma-joined canonical labels, used in prompts and help text.
pub fn genre_list() -> String {
    Genre::all().map(Genre::label).collect::<Vec<_>>().join(", ")
}

/// Parse a comma-separated manual selection.
///
/// Invalid tokens are dropped; order and repeats are kept as typed.
pub fn parse_manual_selection(input: &str) -> Vec<Genre> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(Genre::parse_label)
        .collect()
}

/// Split raw classifier labels into known genres and rejected strings.
pub fn validate_labels<S: AsRef<str>>(labels: &[S]) -> (Vec<Genre>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for label in labels {
        match Genre::parse_label(label.as_ref()) {
            Some(genre) => accepted.push(genre),
            None => rejected.push(label.as_ref().to_string()),
        }
    }

    (accepted, rejected)
}
