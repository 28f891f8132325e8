//! External capabilities the assistant core depends on
//!
//! Each trait is the seam to one collaborator. Implementations convert their
//! own failures into the matching [`crate::Error`] variant; the router and the
//! sequencer branch on those values instead of letting anything escape.

mod console;
mod knowledge;
mod launcher;
mod oracle;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

pub use console::{ConsolePlayer, ConsoleSink, StdinSource};
pub use knowledge::{WikipediaLookup, first_sentences};
pub use launcher::SystemLauncher;
pub use oracle::OpenAiOracle;

use crate::Result;
use crate::config::{AppEntry, Config};

/// Produces transcripts from the outside world
///
/// Ordinary silence and unintelligible audio come back as
/// [`crate::Error::RecognitionTimeout`] and
/// [`crate::Error::RecognitionUnintelligible`]. A source that can never produce
/// input again returns [`crate::Error::SourceExhausted`].
#[async_trait(?Send)]
pub trait SpeechSource {
    /// Wait for one phrase
    ///
    /// `timeout` bounds the wait for speech to begin, `phrase_limit` bounds
    /// the phrase itself.
    async fn listen(&mut self, timeout: Duration, phrase_limit: Duration) -> Result<String>;
}

/// Renders text to playable audio bytes
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Synthesize `text` in the given voice
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;

    /// File extension for the bytes returned by [`SpeechSink::synthesize`]
    fn audio_extension(&self) -> &'static str {
        "mp3"
    }
}

/// Plays an audio file to completion
#[async_trait(?Send)]
pub trait AudioPlayer {
    /// Play the file, returning once playback has finished
    async fn play(&mut self, path: &Path) -> Result<()>;
}

/// Free-form question answering
#[async_trait]
pub trait AiOracle: Send + Sync {
    /// Complete a prompt with a short answer
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Encyclopedia summary lookup
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Summarize a topic in a couple of sentences
    async fn summarize(&self, topic: &str) -> Result<String>;
}

/// Starts desktop applications
pub trait AppLauncher: Send + Sync {
    /// Launch the registered application, fire-and-forget
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LaunchFailure`] if the process cannot be started
    fn launch(&self, app: &AppEntry) -> Result<()>;
}

/// Opens URLs in the default browser
pub trait BrowserOpener: Send + Sync {
    /// Open the URL, fire-and-forget
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SiteOpenFailure`] if the opener cannot be started
    fn open(&self, url: &str) -> Result<()>;
}

/// Collaborators consulted by the intent router
pub struct Services {
    /// Language model fallback, absent when no API key is configured
    pub oracle: Option<Box<dyn AiOracle>>,

    /// Encyclopedia lookup
    pub knowledge: Box<dyn KnowledgeLookup>,

    /// Application launcher
    pub launcher: Box<dyn AppLauncher>,

    /// Default-browser opener
    pub browser: Box<dyn BrowserOpener>,
}

impl Services {
    /// Build the real collaborators from configuration
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self> {
        let oracle: Option<Box<dyn AiOracle>> = match &config.api_keys.openai {
            Some(key) => Some(Box::new(OpenAiOracle::new(key.clone(), config.llm.clone())?)),
            None => {
                tracing::warn!("OPENAI_API_KEY not set, AI fallback disabled");
                None
            }
        };

        Ok(Self {
            oracle,
            knowledge: Box::new(WikipediaLookup::new()?),
            launcher: Box::new(SystemLauncher),
            browser: Box::new(SystemLauncher),
        })
    }
}
