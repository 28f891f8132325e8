//! Speech sequencing
//!
//! Every spoken sentence goes through [`SpeechSequencer::speak`]. The call
//! takes `&mut self` and only returns after playback has finished, so a second
//! utterance cannot start while one is in flight. Each utterance is rendered
//! into its own temporary file which is removed when the call returns, on
//! success and failure alike.

use std::io::Write;

use crate::services::{AudioPlayer, SpeechSink};
use crate::{Error, Result};

/// A single unit of spoken output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Sentence to speak
    pub text: String,

    /// Voice profile identifier understood by the speech sink
    pub voice: String,
}

impl Utterance {
    /// Create an utterance in the given voice
    #[must_use]
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
        }
    }
}

/// What happened to an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Rendered and played to completion
    Spoken,
    /// Empty or whitespace-only text, nothing was done
    Skipped,
    /// Synthesis or playback failed; already logged
    Failed,
}

/// Serializes outbound speech, one utterance at a time
pub struct SpeechSequencer {
    sink: Box<dyn SpeechSink>,
    player: Box<dyn AudioPlayer>,
    voice: String,
}

impl SpeechSequencer {
    /// Create a sequencer speaking in `voice` by default
    #[must_use]
    pub fn new(
        sink: Box<dyn SpeechSink>,
        player: Box<dyn AudioPlayer>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            player,
            voice: voice.into(),
        }
    }

    /// Speak text in the default voice
    pub async fn say(&mut self, text: &str) -> SpeechOutcome {
        let utterance = Utterance::new(text, self.voice.clone());
        self.speak(utterance).await
    }

    /// Render and play one utterance, waiting for playback to finish
    ///
    /// Failures are logged and reported through the outcome only; the caller
    /// carries on as if the sentence had been spoken.
    pub async fn speak(&mut self, utterance: Utterance) -> SpeechOutcome {
        if utterance.text.trim().is_empty() {
            return SpeechOutcome::Skipped;
        }

        tracing::info!(text = %utterance.text, voice = %utterance.voice, "speaking");

        match self.render_and_play(&utterance).await {
            Ok(()) => SpeechOutcome::Spoken,
            Err(e) => {
                tracing::warn!(error = %e, text = %utterance.text, "speech failed, continuing");
                SpeechOutcome::Failed
            }
        }
    }

    async fn render_and_play(&mut self, utterance: &Utterance) -> Result<()> {
        let audio = self
            .sink
            .synthesize(&utterance.text, &utterance.voice)
            .await?;

        if audio.is_empty() {
            return Err(Error::SynthesisFailure("no audio produced".to_string()));
        }

        // Dropped on every exit path below, which deletes the file
        let mut clip = tempfile::Builder::new()
            .prefix("jarvis-")
            .suffix(&format!(".{}", self.sink.audio_extension()))
            .tempfile()
            .map_err(|e| Error::PlaybackFailure(format!("temp file: {e}")))?;
        clip.write_all(&audio)
            .and_then(|()| clip.flush())
            .map_err(|e| Error::PlaybackFailure(format!("temp file: {e}")))?;

        tracing::debug!(path = %clip.path().display(), bytes = audio.len(), "audio rendered");

        self.player.play(clip.path()).await
    }
}
