//! Jarvis - voice command assistant
//!
//! This library provides the core of a wake-word driven desktop assistant:
//! - Transcript normalization and wake word detection
//! - A time-bounded conversation state machine
//! - An ordered first-match intent router with AI fallback
//! - Serialized speech output, one utterance at a time
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Speech Source                       │
//! │        Microphone + STT   │   stdin (--text)         │
//! └────────────────────┬────────────────────────────────┘
//!                      │ raw transcript
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Assistant                         │
//! │  Normalizer │ Wake Word │ Conversation │ Router     │
//! └────────────────────┬────────────────────────────────┘
//!                      │ reply
//! ┌────────────────────▼────────────────────────────────┐
//! │                Speech Sequencer                      │
//! │        TTS + playback   │   console (--text)         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod normalize;
pub mod services;
pub mod voice;

pub use assistant::{Assistant, Flow};
pub use config::Config;
pub use conversation::{ConversationState, Phase, Step};
pub use error::{Error, Result};
pub use intent::{Intent, Route, Routed, Router};
pub use normalize::{Transcript, WordReplacementTable};
pub use services::Services;
pub use voice::{SpeechOutcome, SpeechSequencer, Utterance, WakeWordDetector};
