//! Error types for the Jarvis assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the assistant
///
/// Collaborator failures are caught at the boundary of the call that produced
/// them and turned into either a silent no-op (recognition) or a spoken
/// apology (everything else). Only the ambient variants ever reach the top of
/// the main loop.
#[derive(Debug, Error)]
pub enum Error {
    /// Listen window elapsed without any speech
    #[error("recognition timed out")]
    RecognitionTimeout,

    /// Speech was captured but could not be transcribed
    #[error("speech was unintelligible")]
    RecognitionUnintelligible,

    /// Speech source has no more input (stdin closed, device gone)
    #[error("speech source exhausted")]
    SourceExhausted,

    /// Text-to-speech rendering failed
    #[error("synthesis failed: {0}")]
    SynthesisFailure(String),

    /// Audio playback failed
    #[error("playback failed: {0}")]
    PlaybackFailure(String),

    /// Language model completion failed
    #[error("AI oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Knowledge lookup found nothing for the topic
    #[error("no knowledge entry for: {0}")]
    LookupNotFound(String),

    /// Application could not be launched
    #[error("failed to launch {target}: {reason}")]
    LaunchFailure {
        /// App alias that was requested
        target: String,
        /// Underlying cause
        reason: String,
    },

    /// Browser could not be pointed at a site
    #[error("failed to open {target}: {reason}")]
    SiteOpenFailure {
        /// URL that was requested
        target: String,
        /// Underlying cause
        reason: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Wake word configuration error
    #[error("wake word error: {0}")]
    WakeWord(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether this is an ordinary "didn't hear anything useful" condition
    ///
    /// These never produce a spoken response; the loop just listens again.
    #[must_use]
    pub const fn is_recognition_failure(&self) -> bool {
        matches!(
            self,
            Self::RecognitionTimeout | Self::RecognitionUnintelligible
        )
    }
}
