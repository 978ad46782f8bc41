//! Interactive REPL for the vibe CLI
//!
//! Drives one session: read a vibe (or a manual genre list), resolve it to genres, ask which
//! lookups to run, then dispatch them in order and render the results.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use recommend::{
    Genre, MovieLookup, MusicDataset, VibeClassifier, music, parse_manual_selection,
    related_genres, validate_labels,
};
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};

use crate::output::OutputHandler;

pub const CHOICE_PROMPT: &str = "Recommend [m]ovies, m[u]sic or [b]oth? ";
pub const MANUAL_PROMPT: &str = "Genres (comma separated): ";

/// One read from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupted,
    Eof,
}

/// Source of user input lines
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Line editor on the controlling terminal, with in-session history
pub struct TerminalInput {
    editor: Editor<(), DefaultHistory>,
}

impl TerminalInput {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: Editor::new()?,
        })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.trim());
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }
}

/// Which lookups to run for a resolved set of genres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Movies,
    Music,
    Both,
}

impl Selector {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "m" => Some(Selector::Movies),
            "u" => Some(Selector::Music),
            "b" => Some(Selector::Both),
            _ => None,
        }
    }

    fn jobs(self) -> &'static [Job] {
        match self {
            Selector::Movies => &[Job::Movies],
            Selector::Music => &[Job::Music],
            Selector::Both => &[Job::Movies, Job::Music],
        }
    }
}

/// One lookup run by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Movies,
    Music,
}

/// Top-level command typed at the vibe prompt
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Help,
    Manual,
    Vibe(&'a str),
}

impl<'a> Command<'a> {
    fn parse(input: &'a str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "q" => Command::Quit,
            "help" => Command::Help,
            "manual" => Command::Manual,
            _ => Command::Vibe(input),
        }
    }
}

/// Outcome of turning one vibe line into genres
enum Resolution {
    Genres(Vec<Genre>),
    Retry,
    Exit,
}

/// Session history shown when the session ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub vibes_resolved: usize,
    /// Every lookup run, in dispatch order
    pub jobs: Vec<Job>,
}

impl SessionStats {
    pub fn movie_lookups(&self) -> usize {
        self.jobs.iter().filter(|j| **j == Job::Movies).count()
    }

    pub fn music_lookups(&self) -> usize {
        self.jobs.iter().filter(|j| **j == Job::Music).count()
    }
}

/// Interactive REPL for the vibe CLI
pub struct VibeRepl<I: LineSource> {
    input: I,
    classifier: Box<dyn VibeClassifier>,
    movies: MovieLookup,
    dataset: MusicDataset,
    sample_size: usize,
    job_delay: Duration,
    output: OutputHandler,
    stats: SessionStats,
}

impl<I: LineSource> VibeRepl<I> {
    pub fn new(
        input: I,
        classifier: Box<dyn VibeClassifier>,
        movies: MovieLookup,
        dataset: MusicDataset,
        sample_size: usize,
        job_delay: Duration,
        output: OutputHandler,
    ) -> Self {
        Self {
            input,
            classifier,
            movies,
            dataset,
            sample_size,
            job_delay,
            output,
            stats: SessionStats::default(),
        }
    }

    #[cfg(test)]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Run the interactive REPL until the user quits or input ends
    pub async fn run(&mut self) -> Result<()> {
        self.output
            .print_banner(self.classifier.is_configured(), self.dataset.len());

        loop {
            let prompt = format!("{} {} ", "vibe".bright_green().bold(), ">".bright_green());

            let line = match self.input.read_line(&prompt) {
                Ok(Input::Line(line)) => line,
                Ok(Input::Interrupted) => {
                    self.output.print_info("Type 'q' to quit.");
                    continue;
                }
                Ok(Input::Eof) => break,
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let resolution = match Command::parse(input) {
                Command::Quit => break,
                Command::Help => {
                    self.output.print_help();
                    continue;
                }
                Command::Manual => self.manual_select()?,
                Command::Vibe(text) => self.classify(text).await,
            };

            let genres = match resolution {
                Resolution::Genres(genres) => genres,
                Resolution::Retry => continue,
                Resolution::Exit => break,
            };

            self.stats.vibes_resolved += 1;
            self.output.print_related(&related_genres(&genres));

            let Some(selector) = self.await_choice()? else {
                break;
            };

            self.dispatch(&genres, selector).await;
        }

        self.output.print_goodbye(&self.stats);
        Ok(())
    }

    async fn classify(&mut self, text: &str) -> Resolution {
        if !self.classifier.is_configured() {
            self.output.print_warning(
                "Vibe analysis is unavailable (GEMINI_API_KEY not set). Type 'manual' to pick genres.",
            );
            return Resolution::Retry;
        }

        self.output.print_info("Analyzing your vibe...");

        let labels = match self.classifier.classify(text).await {
            Ok(labels) => labels,
            Err(e) => {
                tracing::debug!("{} classification failed: {}", self.classifier.name(), e);
                self.output.print_warning(&format!(
                    "Could not analyze that vibe ({}). Try again or type 'manual'.",
                    e
                ));
                return Resolution::Retry;
            }
        };

        let (genres, rejected) = validate_labels(&labels);
        if !rejected.is_empty() {
            tracing::warn!("Ignoring unknown genres from classifier: {:?}", rejected);
        }

        if genres.is_empty() {
            self.output
                .print_warning("No known genres matched that vibe. Try describing it differently.");
            return Resolution::Retry;
        }

        self.output.print_suggestion(&genres);
        Resolution::Genres(genres)
    }

    fn manual_select(&mut self) -> Result<Resolution> {
        self.output.print_genre_list();

        let line = loop {
            match self.input.read_line(MANUAL_PROMPT)? {
                Input::Line(line) => break line,
                Input::Interrupted => self
                    .output
                    .print_info("Enter genres separated by commas, or press Enter to go back."),
                Input::Eof => return Ok(Resolution::Exit),
            }
        };

        let genres = parse_manual_selection(&line);
        if genres.is_empty() {
            self.output.print_error("No valid genres entered.");
            return Ok(Resolution::Retry);
        }

        self.output.print_suggestion(&genres);
        Ok(Resolution::Genres(genres))
    }

    /// Prompt until a valid selector is given; `None` when input ends.
    fn await_choice(&mut self) -> Result<Option<Selector>> {
        loop {
            match self.input.read_line(CHOICE_PROMPT)? {
                Input::Line(line) => match Selector::parse(&line) {
                    Some(selector) => return Ok(Some(selector)),
                    None => self.output.print_error("Please enter m, u or b."),
                },
                Input::Interrupted => self.output.print_info("Type 'q' to quit."),
                Input::Eof => return Ok(None),
            }
        }
    }

    async fn dispatch(&mut self, genres: &[Genre], selector: Selector) {
        for &job in selector.jobs() {
            if !self.job_delay.is_zero() {
                tokio::time::sleep(self.job_delay).await;
            }

            self.stats.jobs.push(job);
            match job {
                Job::Movies => {
                    tracing::debug!(genres = ?genres, "Running movie lookup");
                    let report = self.movies.lookup(genres).await;
                    self.output.print_movies(&report);
                }
                Job::Music => {
                    tracing::debug!(genres = ?genres, "Running music lookup");
                    let outcome = music::lookup(&self.dataset, genres, self.sample_size);
                    self.output.print_tracks(&outcome.into_records());
                }
            }
        }
    }
}
