//! Shared test utilities
//!
//! Mock collaborators that record what the assistant asked of them.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jarvis_assistant::config::{AppEntry, AppRegistry};
use jarvis_assistant::services::{
    AiOracle, AppLauncher, AudioPlayer, BrowserOpener, KnowledgeLookup, Services, SpeechSink,
    SpeechSource,
};
use jarvis_assistant::{Error, Result, Router, SpeechSequencer};

pub type Log<T> = Arc<Mutex<Vec<T>>>;

/// Something a speech mock observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Synthesized(String),
    PlayStarted { text: String, path: PathBuf },
    PlayFinished { text: String, path: PathBuf },
}

/// How the mocked services behave
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Oracle present at all
    pub oracle_configured: bool,
    /// Oracle answer; `None` while configured makes it fail
    pub oracle_answer: Option<String>,
    /// Lookup summary; `None` means not found
    pub summary: Option<String>,
    pub launch_fails: bool,
    pub browser_fails: bool,
}

impl Behavior {
    #[must_use]
    pub fn with_oracle(answer: &str) -> Self {
        Self {
            oracle_configured: true,
            oracle_answer: Some(answer.to_string()),
            ..Self::default()
        }
    }
}

/// Records of every collaborator call made during a test
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub events: Log<Event>,
    pub oracle_calls: Log<String>,
    pub lookups: Log<String>,
    pub launched: Log<String>,
    pub opened: Log<String>,
}

impl Fixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts whose playback completed, in order
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::PlayFinished { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    #[must_use]
    pub fn oracle_calls(&self) -> Vec<String> {
        self.oracle_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    #[must_use]
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Sequencer backed by a recording sink and player
    #[must_use]
    pub fn sequencer(&self) -> SpeechSequencer {
        SpeechSequencer::new(
            Box::new(RecordingSink::new(self.events.clone())),
            Box::new(RecordingPlayer::new(self.events.clone())),
            "onyx",
        )
    }

    /// Mock services wired to this fixture's logs
    #[must_use]
    pub fn services(&self, behavior: &Behavior) -> Services {
        let oracle: Option<Box<dyn AiOracle>> = behavior.oracle_configured.then(|| {
            Box::new(MockOracle {
                calls: self.oracle_calls.clone(),
                answer: behavior.oracle_answer.clone(),
            }) as Box<dyn AiOracle>
        });

        Services {
            oracle,
            knowledge: Box::new(MockLookup {
                calls: self.lookups.clone(),
                summary: behavior.summary.clone(),
            }),
            launcher: Box::new(MockLauncher {
                launched: self.launched.clone(),
                fail: behavior.launch_fails,
            }),
            browser: Box::new(MockBrowser {
                opened: self.opened.clone(),
                fail: behavior.browser_fails,
            }),
        }
    }

    /// Router over the default app table and mock services
    #[must_use]
    pub fn router(&self, behavior: &Behavior) -> Router {
        Router::new(AppRegistry::default(), self.services(behavior))
    }
}

/// Sink that hands the text back as bytes
pub struct RecordingSink {
    events: Log<Event>,
    fail_on: Option<String>,
}

impl RecordingSink {
    #[must_use]
    pub fn new(events: Log<Event>) -> Self {
        Self {
            events,
            fail_on: None,
        }
    }

    /// Fail synthesis for this exact text
    #[must_use]
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }
}

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(Error::SynthesisFailure("mock failure".to_string()));
        }
        self.events
            .lock()
            .unwrap()
            .push(Event::Synthesized(text.to_string()));
        Ok(text.as_bytes().to_vec())
    }

    fn audio_extension(&self) -> &'static str {
        "txt"
    }
}

/// How a [`RecordingPlayer`] finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Complete,
    Fail,
    Hang,
}

/// Player that records start and finish around a short simulated playback
pub struct RecordingPlayer {
    events: Log<Event>,
    duration: Duration,
    mode: PlayMode,
}

impl RecordingPlayer {
    #[must_use]
    pub fn new(events: Log<Event>) -> Self {
        Self {
            events,
            duration: Duration::from_millis(20),
            mode: PlayMode::Complete,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PlayMode) -> Self {
        self.mode = mode;
        self
    }
}

#[async_trait(?Send)]
impl AudioPlayer for RecordingPlayer {
    async fn play(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let path = path.to_path_buf();

        self.events.lock().unwrap().push(Event::PlayStarted {
            text: text.clone(),
            path: path.clone(),
        });

        match self.mode {
            PlayMode::Complete => {}
            PlayMode::Fail => return Err(Error::PlaybackFailure("mock device lost".to_string())),
            PlayMode::Hang => std::future::pending::<()>().await,
        }

        tokio::time::sleep(self.duration).await;

        self.events
            .lock()
            .unwrap()
            .push(Event::PlayFinished { text, path });
        Ok(())
    }
}

pub struct MockOracle {
    calls: Log<String>,
    answer: Option<String>,
}

#[async_trait]
impl AiOracle for MockOracle {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| Error::OracleUnavailable("mock offline".to_string()))
    }
}

pub struct MockLookup {
    calls: Log<String>,
    summary: Option<String>,
}

#[async_trait]
impl KnowledgeLookup for MockLookup {
    async fn summarize(&self, topic: &str) -> Result<String> {
        self.calls.lock().unwrap().push(topic.to_string());
        self.summary
            .clone()
            .ok_or_else(|| Error::LookupNotFound(topic.to_string()))
    }
}

pub struct MockLauncher {
    launched: Log<String>,
    fail: bool,
}

impl AppLauncher for MockLauncher {
    fn launch(&self, app: &AppEntry) -> Result<()> {
        if self.fail {
            return Err(Error::LaunchFailure {
                target: app.alias.clone(),
                reason: "mock failure".to_string(),
            });
        }
        self.launched.lock().unwrap().push(app.launch.clone());
        Ok(())
    }
}

pub struct MockBrowser {
    opened: Log<String>,
    fail: bool,
}

impl BrowserOpener for MockBrowser {
    fn open(&self, url: &str) -> Result<()> {
        if self.fail {
            return Err(Error::SiteOpenFailure {
                target: url.to_string(),
                reason: "mock failure".to_string(),
            });
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// One scripted listen
pub enum Cue {
    Heard(Result<String>),
    /// Nothing heard for this long, then a recognition timeout
    Silence(Duration),
}

/// Speech source replaying a fixed script
///
/// Once the script runs out it either reports exhaustion or waits forever,
/// leaving the loop to be stopped from outside.
pub struct ScriptedSource {
    script: VecDeque<Cue>,
    hang_when_done: bool,
    pub listens: usize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(lines: &[&str]) -> Self {
        Self {
            script: lines
                .iter()
                .map(|l| Cue::Heard(Ok((*l).to_string())))
                .collect(),
            hang_when_done: false,
            listens: 0,
        }
    }

    #[must_use]
    pub fn hanging(mut self) -> Self {
        self.hang_when_done = true;
        self
    }

    /// Queue an error result
    pub fn push_error(&mut self, error: Error) {
        self.script.push_back(Cue::Heard(Err(error)));
    }

    /// Queue a heard line
    pub fn push_line(&mut self, line: &str) {
        self.script.push_back(Cue::Heard(Ok(line.to_string())));
    }

    /// Queue a listen that hears nothing for `duration`
    pub fn push_silence(&mut self, duration: Duration) {
        self.script.push_back(Cue::Silence(duration));
    }
}

#[async_trait(?Send)]
impl SpeechSource for ScriptedSource {
    async fn listen(&mut self, _timeout: Duration, _phrase_limit: Duration) -> Result<String> {
        self.listens += 1;
        match self.script.pop_front() {
            Some(Cue::Heard(entry)) => entry,
            Some(Cue::Silence(duration)) => {
                tokio::time::sleep(duration).await;
                Err(Error::RecognitionTimeout)
            }
            None if self.hang_when_done => std::future::pending().await,
            None => Err(Error::SourceExhausted),
        }
    }
}
