//! Microphone speech source
//!
//! Capture → segment → WAV → STT. Every ordinary failure ends up as one of the
//! two recognition errors so the main loop can simply listen again.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use super::segmenter::UtteranceSegmenter;
use super::stt::SpeechToText;
use crate::services::SpeechSource;
use crate::{Error, Result};

/// How often the capture buffer is drained (100ms)
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Live microphone input transcribed by a cloud STT backend
pub struct MicrophoneSource {
    capture: AudioCapture,
    stt: SpeechToText,
}

impl MicrophoneSource {
    /// Wrap an opened capture device and a transcriber
    #[must_use]
    pub const fn new(capture: AudioCapture, stt: SpeechToText) -> Self {
        Self { capture, stt }
    }

    /// Wait for one phrase and return its samples
    async fn capture_phrase(&mut self, timeout: Duration, phrase_limit: Duration) -> Result<Vec<f32>> {
        self.capture.start()?;
        // Anything buffered while we were speaking is our own voice
        self.capture.clear_buffer();

        #[allow(clippy::cast_possible_truncation)]
        let max_samples = (phrase_limit.as_secs_f64() * f64::from(SAMPLE_RATE)) as usize;
        let mut segmenter = UtteranceSegmenter::new(max_samples.max(1));
        let started = Instant::now();

        tracing::debug!("listening");

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let samples = self.capture.take_buffer();
            if segmenter.push(&samples) {
                return Ok(segmenter.take_phrase());
            }

            if !segmenter.is_speaking() && started.elapsed() > timeout {
                return Err(Error::RecognitionTimeout);
            }
        }
    }
}

#[async_trait(?Send)]
impl SpeechSource for MicrophoneSource {
    async fn listen(&mut self, timeout: Duration, phrase_limit: Duration) -> Result<String> {
        let phrase = self.capture_phrase(timeout, phrase_limit).await?;

        tracing::debug!(samples = phrase.len(), "phrase captured, transcribing");
        let wav = samples_to_wav(&phrase, SAMPLE_RATE)?;

        match self.stt.transcribe(&wav).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::info!(transcript = %text, "heard");
                Ok(text)
            }
            Ok(_) => Err(Error::RecognitionUnintelligible),
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                Err(Error::RecognitionUnintelligible)
            }
        }
    }
}
