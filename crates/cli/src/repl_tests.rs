//! Tests for the interactive loop

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use anyhow::Result;
    use async_trait::async_trait;
    use recommend::{ClassifierError, MovieLookup, MovieSettings, MusicDataset, VibeClassifier};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, query_param},
    };

    use crate::{
        output::OutputHandler,
        repl::{CHOICE_PROMPT, Input, Job, LineSource, MANUAL_PROMPT, Selector, VibeRepl},
    };

    /// Pre-recorded input; yields `Eof` once exhausted and remembers every prompt shown.
    #[derive(Default)]
    struct ScriptedInput {
        lines: VecDeque<Input>,
        prompts: Vec<String>,
    }

    impl ScriptedInput {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| Input::Line(l.to_string())).collect(),
                prompts: Vec::new(),
            }
        }

        fn with(inputs: Vec<Input>) -> Self {
            Self {
                lines: inputs.into(),
                prompts: Vec::new(),
            }
        }

        fn count(&self, prompt: &str) -> usize {
            self.prompts.iter().filter(|p| p.as_str() == prompt).count()
        }
    }

    impl LineSource for ScriptedInput {
        fn read_line(&mut self, prompt: &str) -> Result<Input> {
            self.prompts.push(prompt.to_string());
            Ok(self.lines.pop_front().unwrap_or(Input::Eof))
        }
    }

    enum Reply {
        Labels(Vec<&'static str>),
        Unreachable,
    }

    struct StubClassifier {
        reply: Reply,
        configured: bool,
        calls: Arc<AtomicUsize>,
    }

    impl StubClassifier {
        fn boxed(reply: Reply, configured: bool) -> (Box<dyn VibeClassifier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = StubClassifier {
                reply,
                configured,
                calls: calls.clone(),
            };
            (Box::new(stub), calls)
        }
    }

    #[async_trait]
    impl VibeClassifier for StubClassifier {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn classify(&self, _text: &str) -> Result<Vec<String>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Labels(labels) => Ok(labels.iter().map(|l| l.to_string()).collect()),
                Reply::Unreachable => {
                    Err(ClassifierError::RequestFailed("connection refused".to_string()))
                }
            }
        }
    }

    fn dataset() -> MusicDataset {
        let csv = "track_name,artists,album_name,track_genre\n\
                   Song A,Band A,LP A,rock\n\
                   Song B,Band B,LP B,rock\n\
                   Tune C,Trio C,Set C,jazz\n";
        MusicDataset::from_reader(csv.as_bytes()).unwrap()
    }

    fn offline_movies() -> MovieLookup {
        MovieLookup::new(MovieSettings {
            search_url: "http://127.0.0.1:9/search/title/".to_string(),
            timeout_secs: 1,
            ..MovieSettings::default()
        })
        .unwrap()
    }

    fn repl(
        input: ScriptedInput,
        classifier: Box<dyn VibeClassifier>,
        movies: MovieLookup,
    ) -> VibeRepl<ScriptedInput> {
        delayed_repl(input, classifier, movies, Duration::ZERO)
    }

    fn delayed_repl(
        input: ScriptedInput,
        classifier: Box<dyn VibeClassifier>,
        movies: MovieLookup,
        job_delay: Duration,
    ) -> VibeRepl<ScriptedInput> {
        VibeRepl::new(
            input,
            classifier,
            movies,
            dataset(),
            10,
            job_delay,
            OutputHandler::new(false),
        )
    }

    #[test]
    fn selector_accepts_only_m_u_b() {
        assert_eq!(Selector::parse("m"), Some(Selector::Movies));
        assert_eq!(Selector::parse(" U "), Some(Selector::Music));
        assert_eq!(Selector::parse("B"), Some(Selector::Both));
        assert_eq!(Selector::parse("x"), None);
        assert_eq!(Selector::parse("movies"), None);
        assert_eq!(Selector::parse(""), None);
    }

    #[tokio::test]
    async fn unreachable_classifier_never_reaches_choice() {
        let (classifier, calls) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = repl(
            ScriptedInput::new(&["rainy day, want to cry"]),
            classifier,
            offline_movies(),
        );

        repl.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repl.input().count(CHOICE_PROMPT), 0);
        assert_eq!(repl.stats().vibes_resolved, 0);
        // back at the vibe prompt, which then hits end of input
        assert_eq!(repl.input().prompts.len(), 2);
    }

    #[tokio::test]
    async fn unknown_labels_only_reprompt_for_vibe() {
        let (classifier, _) = StubClassifier::boxed(Reply::Labels(vec!["Spooky", "Vibes"]), true);
        let mut repl = repl(ScriptedInput::new(&["eerie"]), classifier, offline_movies());

        repl.run().await.unwrap();

        assert_eq!(repl.input().count(CHOICE_PROMPT), 0);
        assert_eq!(repl.stats().vibes_resolved, 0);
    }

    #[tokio::test]
    async fn unconfigured_classifier_is_not_called() {
        let (classifier, calls) = StubClassifier::boxed(Reply::Labels(vec!["Drama"]), false);
        let mut repl = repl(ScriptedInput::new(&["sad"]), classifier, offline_movies());

        repl.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(repl.input().count(CHOICE_PROMPT), 0);
    }

    #[tokio::test]
    async fn manual_selection_then_music_only() {
        let (classifier, calls) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = repl(
            ScriptedInput::new(&["MANUAL", "action, Drama, bogus", "x", "u", "q"]),
            classifier,
            offline_movies(),
        );

        repl.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(repl.input().count(MANUAL_PROMPT), 1);
        // invalid "x" re-prompts once
        assert_eq!(repl.input().count(CHOICE_PROMPT), 2);

        let stats = repl.stats();
        assert_eq!(stats.vibes_resolved, 1);
        assert_eq!(stats.music_lookups(), 1);
        assert_eq!(stats.movie_lookups(), 0);
    }

    #[tokio::test]
    async fn all_invalid_manual_entry_returns_to_vibe_prompt() {
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = repl(
            ScriptedInput::new(&["manual", "bogus, xyz", "q"]),
            classifier,
            offline_movies(),
        );

        repl.run().await.unwrap();

        assert_eq!(repl.input().count(CHOICE_PROMPT), 0);
        assert_eq!(repl.stats().vibes_resolved, 0);
        assert_eq!(repl.input().prompts.len(), 3);
    }

    #[tokio::test]
    async fn quit_is_case_insensitive_and_immediate() {
        let (classifier, _) = StubClassifier::boxed(Reply::Labels(vec!["Drama"]), true);
        let mut repl = repl(
            ScriptedInput::new(&["  Q ", "never read"]),
            classifier,
            offline_movies(),
        );

        repl.run().await.unwrap();

        assert_eq!(repl.input().prompts.len(), 1);
    }

    #[tokio::test]
    async fn empty_lines_help_and_interrupts_reprompt() {
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let input = ScriptedInput::with(vec![
            Input::Line(String::new()),
            Input::Interrupted,
            Input::Line("help".to_string()),
            Input::Line("q".to_string()),
            Input::Line("never read".to_string()),
        ]);
        let mut repl = repl(input, classifier, offline_movies());

        repl.run().await.unwrap();

        assert_eq!(repl.input().prompts.len(), 4);
        assert_eq!(repl.stats().vibes_resolved, 0);
    }

    #[tokio::test]
    async fn end_of_input_at_choice_prompt_exits() {
        let (classifier, _) = StubClassifier::boxed(Reply::Labels(vec!["Romance"]), true);
        let mut repl = repl(ScriptedInput::new(&["in love"]), classifier, offline_movies());

        repl.run().await.unwrap();

        assert_eq!(repl.input().count(CHOICE_PROMPT), 1);
        assert_eq!(repl.stats().vibes_resolved, 1);
        assert_eq!(repl.stats().music_lookups(), 0);
    }

    #[tokio::test]
    async fn both_runs_movies_then_music_for_classified_genres() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("genres", "horror"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="ipc-title-link-wrapper"><h3 class="ipc-title__text">1. Alien</h3></a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("genres", "mystery"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let movies = MovieLookup::new(MovieSettings {
            search_url: format!("{}/search/title/", server.uri()),
            timeout_secs: 2,
            ..MovieSettings::default()
        })
        .unwrap();

        let (classifier, calls) =
            StubClassifier::boxed(Reply::Labels(vec!["Horror", "Spooky", "mystery"]), true);
        let mut repl = repl(
            ScriptedInput::new(&["haunted house", "b", "q"]),
            classifier,
            movies,
        );

        repl.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = repl.stats();
        assert_eq!(stats.vibes_resolved, 1);
        assert_eq!(stats.movie_lookups(), 1);
        assert_eq!(stats.music_lookups(), 1);
        assert_eq!(stats.jobs, vec![Job::Movies, Job::Music]);
    }

    #[tokio::test]
    async fn jobs_run_in_selection_order_across_rounds() {
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = repl(
            ScriptedInput::new(&["manual", "romance", "u", "manual", "action", "m", "q"]),
            classifier,
            offline_movies(),
        );

        repl.run().await.unwrap();

        assert_eq!(repl.stats().jobs, vec![Job::Music, Job::Movies]);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_awaited_once_before_each_job() {
        let delay = Duration::from_secs(2);
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = delayed_repl(
            ScriptedInput::new(&["manual", "action", "u", "manual", "drama", "u", "q"]),
            classifier,
            offline_movies(),
            delay,
        );

        let start = tokio::time::Instant::now();
        repl.run().await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(repl.stats().jobs, vec![Job::Music, Job::Music]);
        assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
        assert!(elapsed < delay * 3, "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_does_not_sleep() {
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let mut repl = delayed_repl(
            ScriptedInput::new(&["manual", "action", "u", "q"]),
            classifier,
            offline_movies(),
            Duration::ZERO,
        );

        let start = tokio::time::Instant::now();
        repl.run().await.unwrap();

        assert_eq!(repl.stats().jobs, vec![Job::Music]);
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test]
    async fn interrupt_at_manual_prompt_reprompts_for_genres() {
        let (classifier, _) = StubClassifier::boxed(Reply::Unreachable, true);
        let input = ScriptedInput::with(vec![
            Input::Line("manual".to_string()),
            Input::Interrupted,
            Input::Line("q".to_string()),
            Input::Line("u".to_string()),
        ]);
        let mut repl = repl(input, classifier, offline_movies());

        repl.run().await.unwrap();

        // "q" here is a genre entry, not quit
        assert_eq!(repl.input().count(MANUAL_PROMPT), 2);
        assert_eq!(repl.stats().vibes_resolved, 0);
        assert_eq!(repl.input().count(CHOICE_PROMPT), 0);
    }
}
