//! The assistant main loop
//!
//! Listen, normalize, drive the conversation state, route, speak. One
//! transcript is handled completely (including playback of its reply) before
//! the next listen starts.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Config;
use crate::conversation::{ConversationState, Step};
use crate::intent::Router;
use crate::normalize::{Transcript, WordReplacementTable};
use crate::services::SpeechSource;
use crate::voice::{SpeechSequencer, WakeWordDetector};
use crate::{Error, Result};

pub const STARTUP_GREETING: &str = "Jarvis online, sir.";
pub const WAKE_ACKNOWLEDGEMENT: &str = "Listening, sir.";
pub const ABORT_FAREWELL: &str = "Shutting down.";
pub const FATAL_ERROR_REPLY: &str = "An error occurred, sir.";

/// Whether the loop keeps going after a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Voice command assistant
pub struct Assistant {
    normalizer: WordReplacementTable,
    detector: WakeWordDetector,
    state: ConversationState,
    router: Router,
    sequencer: SpeechSequencer,
    listen_timeout: Duration,
    phrase_limit: Duration,
}

impl Assistant {
    /// Assemble the assistant from configuration and its collaborators
    ///
    /// # Errors
    ///
    /// Returns error if the configured wake word list is unusable
    pub fn new(config: &Config, router: Router, sequencer: SpeechSequencer) -> Result<Self> {
        let detector = WakeWordDetector::new(config.assistant.wake_words.clone())?;

        Ok(Self {
            normalizer: config.replacements.clone(),
            detector,
            state: ConversationState::new(config.assistant.conversation_timeout),
            router,
            sequencer,
            listen_timeout: config.assistant.listen_timeout,
            phrase_limit: config.assistant.phrase_limit,
        })
    }

    /// Current conversation state
    #[must_use]
    pub const fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Apply the inactivity timeout, returns true if it fired just now
    pub fn tick(&mut self) -> bool {
        self.state.check_timeout(Instant::now())
    }

    /// Handle one raw transcript end to end
    pub async fn handle_transcript(&mut self, raw: &str) -> Flow {
        let transcript = Transcript::new(raw, &self.normalizer);
        if transcript.is_empty() {
            return Flow::Continue;
        }
        if transcript.was_rewritten() {
            tracing::debug!(raw = %transcript.raw, normalized = %transcript.normalized, "transcript normalized");
        }

        let is_wake = self.detector.is_wake(&transcript.normalized);

        match self.state.on_transcript(is_wake, transcript.captured_at) {
            Step::Acknowledge => {
                self.sequencer.say(WAKE_ACKNOWLEDGEMENT).await;
                Flow::Continue
            }
            Step::Discard => {
                tracing::debug!(transcript = %transcript.normalized, "idle, ignoring");
                Flow::Continue
            }
            Step::Ignore => Flow::Terminate,
            Step::Route => {
                let routed = self.router.route(&transcript.normalized).await;
                self.sequencer.say(&routed.reply).await;

                if routed.terminates() {
                    self.state.terminate();
                    Flow::Terminate
                } else {
                    Flow::Continue
                }
            }
        }
    }

    /// One listen and its handling
    async fn cycle<S>(&mut self, source: &mut S) -> Result<Flow>
    where
        S: SpeechSource + ?Sized,
    {
        match source.listen(self.listen_timeout, self.phrase_limit).await {
            Ok(raw) => Ok(self.handle_transcript(&raw).await),
            Err(e) if e.is_recognition_failure() => {
                tracing::trace!(reason = %e, "nothing heard");
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    /// Run until a shutdown command, an abort, or source exhaustion
    ///
    /// A message on `shutdown_rx` abandons whatever cycle is in flight
    /// (releasing any clip it held) and speaks a last farewell.
    ///
    /// # Errors
    ///
    /// Returns the first unexpected error after trying to announce it
    #[allow(clippy::future_not_send)]
    pub async fn run<S>(&mut self, source: &mut S, shutdown_rx: &mut mpsc::Receiver<()>) -> Result<()>
    where
        S: SpeechSource + ?Sized,
    {
        tracing::info!(
            wake_words = ?self.detector.wake_words(),
            timeout_secs = self.state.timeout().as_secs(),
            "assistant started"
        );
        self.sequencer.say(STARTUP_GREETING).await;

        loop {
            self.tick();

            let outcome = tokio::select! {
                Some(()) = shutdown_rx.recv() => None,
                result = self.cycle(source) => Some(result),
            };

            match outcome {
                Some(Ok(Flow::Continue)) => {}
                Some(Ok(Flow::Terminate)) => {
                    tracing::info!("shutdown command received");
                    return Ok(());
                }
                None | Some(Err(Error::SourceExhausted)) => {
                    tracing::info!("shutdown requested");
                    self.state.terminate();
                    self.sequencer.say(ABORT_FAREWELL).await;
                    return Ok(());
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "assistant loop failed");
                    self.state.terminate();
                    self.sequencer.say(FATAL_ERROR_REPLY).await;
                    return Err(e);
                }
            }
        }
    }
}
