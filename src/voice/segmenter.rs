//! Energy-based utterance segmentation
//!
//! Cuts a continuous microphone stream into phrases: speech starts when the
//! chunk energy crosses a threshold and ends after a stretch of silence, or
//! when the phrase limit is reached.

/// Minimum audio energy threshold to consider speech
pub const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to keep (0.3 seconds at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends a phrase (0.8 seconds at 16kHz)
const SILENCE_SAMPLES: usize = 12_800;

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Waiting for speech
    Waiting,
    /// Speech started, accumulating
    Speaking,
    /// Phrase finished, ready to be taken
    Complete,
}

/// Accumulates one phrase at a time from streamed samples
#[derive(Debug)]
pub struct UtteranceSegmenter {
    state: SegmenterState,
    speech_buffer: Vec<f32>,
    silence_counter: usize,
    max_samples: usize,
}

impl UtteranceSegmenter {
    /// Create a segmenter that caps phrases at `max_samples`
    #[must_use]
    pub const fn new(max_samples: usize) -> Self {
        Self {
            state: SegmenterState::Waiting,
            speech_buffer: Vec::new(),
            silence_counter: 0,
            max_samples,
        }
    }

    /// Feed a chunk of samples; returns true once a phrase is complete
    pub fn push(&mut self, samples: &[f32]) -> bool {
        let energy = calculate_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            SegmenterState::Waiting => {
                if is_speech {
                    self.state = SegmenterState::Speaking;
                    self.speech_buffer.clear();
                    self.speech_buffer.extend_from_slice(samples);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            SegmenterState::Speaking => {
                self.speech_buffer.extend_from_slice(samples);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                let voiced = self.speech_buffer.len().saturating_sub(self.silence_counter);

                if self.speech_buffer.len() >= self.max_samples {
                    tracing::debug!(samples = self.speech_buffer.len(), "phrase limit reached");
                    self.speech_buffer.truncate(self.max_samples);
                    self.state = SegmenterState::Complete;
                } else if self.silence_counter > SILENCE_SAMPLES {
                    if voiced > MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.speech_buffer.len(), "phrase complete");
                        self.state = SegmenterState::Complete;
                    } else {
                        tracing::trace!("blip too short, resetting");
                        self.reset();
                    }
                }
            }
            SegmenterState::Complete => {}
        }

        self.state == SegmenterState::Complete
    }

    /// Whether speech has started and the phrase is still open
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.state == SegmenterState::Speaking
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }

    /// Take the accumulated phrase and reset
    pub fn take_phrase(&mut self) -> Vec<f32> {
        let phrase = std::mem::take(&mut self.speech_buffer);
        self.reset();
        phrase
    }

    /// Reset to waiting
    pub fn reset(&mut self) {
        self.state = SegmenterState::Waiting;
        self.speech_buffer.clear();
        self.silence_counter = 0;
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHUNK: usize = 1600;

    fn loud() -> Vec<f32> {
        vec![0.5; CHUNK]
    }

    fn quiet() -> Vec<f32> {
        vec![0.0; CHUNK]
    }

    #[test]
    fn test_energy_calculation() {
        assert!(calculate_energy(&quiet()) < 0.001);
        assert!(calculate_energy(&loud()) > 0.4);
        assert!(calculate_energy(&[]) < f32::EPSILON);
    }

    #[test]
    fn test_silence_never_starts_a_phrase() {
        let mut segmenter = UtteranceSegmenter::new(80_000);
        for _ in 0..50 {
            assert!(!segmenter.push(&quiet()));
        }
        assert_eq!(segmenter.state(), SegmenterState::Waiting);
    }

    #[test]
    fn test_speech_then_silence_completes() {
        let mut segmenter = UtteranceSegmenter::new(80_000);

        for _ in 0..5 {
            assert!(!segmenter.push(&loud()));
        }
        assert!(segmenter.is_speaking());

        let mut complete = false;
        for _ in 0..10 {
            complete = segmenter.push(&quiet());
            if complete {
                break;
            }
        }
        assert!(complete);

        let phrase = segmenter.take_phrase();
        assert!(phrase.len() >= 5 * CHUNK);
        assert_eq!(segmenter.state(), SegmenterState::Waiting);
    }

    #[test]
    fn test_short_blip_is_dropped() {
        let mut segmenter = UtteranceSegmenter::new(80_000);

        segmenter.push(&loud());
        for _ in 0..10 {
            assert!(!segmenter.push(&quiet()));
        }
        assert_eq!(segmenter.state(), SegmenterState::Waiting);
    }

    #[test]
    fn test_phrase_limit_cuts_long_speech() {
        let mut segmenter = UtteranceSegmenter::new(CHUNK * 3);

        assert!(!segmenter.push(&loud()));
        assert!(!segmenter.push(&loud()));
        assert!(segmenter.push(&loud()));
        assert_eq!(segmenter.take_phrase().len(), CHUNK * 3);
    }
}
