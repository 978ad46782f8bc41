//! Output formatting and terminal rendering

use colored::Colorize;
use recommend::{Genre, MovieReport, TrackRecord, genre_list};

use crate::repl::SessionStats;

const TRACK_WIDTH: usize = 32;
const ARTIST_WIDTH: usize = 24;
const ALBUM_WIDTH: usize = 28;

/// Shorten `text` to `width` characters, marking the cut with "...".
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn join_genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numbered movie list, one title per line.
pub fn render_movie_list(titles: &[String]) -> Vec<String> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{:>2}. {}", i + 1, title))
        .collect()
}

/// Boxed `Track | Artist | Album` table.
pub fn render_track_table(tracks: &[TrackRecord]) -> Vec<String> {
    let border = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}{}{}",
            left,
            "─".repeat(TRACK_WIDTH + 2),
            mid,
            "─".repeat(ARTIST_WIDTH + 2),
            mid,
            "─".repeat(ALBUM_WIDTH + 2),
            right
        )
    };
    let row = |track: &str, artist: &str, album: &str| {
        format!(
            "│ {:<tw$} │ {:<aw$} │ {:<lw$} │",
            fit(track, TRACK_WIDTH),
            fit(artist, ARTIST_WIDTH),
            fit(album, ALBUM_WIDTH),
            tw = TRACK_WIDTH,
            aw = ARTIST_WIDTH,
            lw = ALBUM_WIDTH
        )
    };

    let mut lines = vec![
        border("┌", "┬", "┐"),
        row("Track", "Artist", "Album"),
        border("├", "┼", "┤"),
    ];
    lines.extend(tracks.iter().map(|t| row(&t.track, &t.artist, &t.album)));
    lines.push(border("└", "┴", "┘"));
    lines
}

/// Output handler for terminal display
pub struct OutputHandler;

impl OutputHandler {
    /// Styling is process-wide; `color = false` turns it off for every handler.
    pub fn new(color: bool) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self
    }

    /// Print the welcome banner
    pub fn print_banner(&self, classifier_ready: bool, dataset_tracks: usize) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗".bright_cyan()
        );
        println!(
            "{}",
            "║                   Vibe Recommender                            ║".bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝".bright_cyan()
        );
        println!(
            "  {} {}",
            "Tracks loaded:".dimmed(),
            dataset_tracks.to_string().bright_white()
        );
        if classifier_ready {
            println!("  {} {}", "Vibe analysis:".dimmed(), "ready".bright_green());
        } else {
            println!(
                "  {} {}",
                "Vibe analysis:".dimmed(),
                "disabled (GEMINI_API_KEY not set), use 'manual'".yellow()
            );
        }
        println!(
            "  {}",
            "Describe your vibe, type 'manual' to pick genres, 'help' or 'q' to quit.".dimmed()
        );
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print an info message
    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Print the genres available for manual selection
    pub fn print_genre_list(&self) {
        println!();
        println!("{} {}", "Available genres:".bright_white().bold(), genre_list());
    }

    pub fn print_suggestion(&self, genres: &[Genre]) {
        self.print_success(&format!("Suggested genres: {}", join_genres(genres)));
    }

    pub fn print_related(&self, related: &[Genre]) {
        if related.is_empty() {
            return;
        }
        println!(
            "  {} {}",
            "You might also like:".dimmed(),
            join_genres(related).bright_cyan()
        );
    }

    /// Print movie results, or the empty placeholder, plus a warning per failed genre
    pub fn print_movies(&self, report: &MovieReport) {
        self.print_header("Movie recommendations");

        if report.is_empty() {
            println!("  {}", "No movie results found.".dimmed());
        } else {
            for line in render_movie_list(&report.titles) {
                println!("  {}", line.bright_white());
            }
        }

        for failure in &report.failures {
            self.print_warning(&format!(
                "Could not fetch {} movies: {}",
                failure.genre, failure.reason
            ));
        }
    }

    /// Print music results as a boxed table
    pub fn print_tracks(&self, tracks: &[TrackRecord]) {
        self.print_header("Music recommendations");

        for line in render_track_table(tracks) {
            println!("  {}", line);
        }
    }

    /// Print help information
    pub fn print_help(&self) {
        println!();
        println!("{}", "Vibe Recommender".bright_white().bold());
        println!("{}", "─".repeat(50).dimmed());
        println!();
        println!(
            "  {}    Describe a mood to get genre suggestions",
            "<any text>".bright_yellow()
        );
        println!("  {}        Choose genres yourself", "manual".bright_yellow());
        println!("  {}          Show this help", "help".bright_yellow());
        println!("  {}             Exit", "q".bright_yellow());
        println!();
        println!("{}", "After genres are chosen:".bright_cyan());
        println!(
            "  {}  movies   {}  music   {}  both",
            "m".bright_yellow(),
            "u".bright_yellow(),
            "b".bright_yellow()
        );
        println!();
    }

    pub fn print_goodbye(&self, stats: &SessionStats) {
        println!();
        println!(
            "{} {}",
            "Goodbye!".bright_green().bold(),
            format!(
                "({} vibes, {} movie and {} music lookups this session)",
                stats.vibes_resolved,
                stats.movie_lookups(),
                stats.music_lookups()
            )
            .dimmed()
        );
    }
}
