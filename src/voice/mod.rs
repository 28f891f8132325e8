//! Voice processing module
//!
//! Handles audio capture, phrase segmentation, wake word detection,
//! STT/TTS backends, playback and speech sequencing.

mod capture;
mod microphone;
mod playback;
mod segmenter;
mod sequencer;
mod stt;
mod tts;
mod wake_word;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use microphone::MicrophoneSource;
pub use playback::{Clip, CpalPlayer, decode_mp3};
pub use segmenter::{SegmenterState, UtteranceSegmenter, calculate_energy};
pub use sequencer::{SpeechOutcome, SpeechSequencer, Utterance};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use wake_word::{DEFAULT_WAKE_WORDS, WakeWordDetector};
