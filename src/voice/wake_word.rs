//! Wake word detection
//!
//! Detection works on the normalized transcript, not on audio. Any configured
//! wake token appearing anywhere in the text counts, with no word-boundary
//! anchoring, so truncated recognitions ("jarv", "ja") still wake the
//! assistant. The flip side is that short tokens also fire inside unrelated
//! words.

use crate::{Error, Result};

/// Wake tokens used when none are configured, most specific first
pub const DEFAULT_WAKE_WORDS: &[&str] = &["jarvis", "jarvi", "jarv", "jar", "ja"];

/// Detects wake words in normalized transcripts
#[derive(Debug, Clone)]
pub struct WakeWordDetector {
    wake_words: Vec<String>,
}

impl WakeWordDetector {
    /// Create a new wake word detector
    ///
    /// # Arguments
    ///
    /// * `wake_words` - Ordered list of wake tokens (e.g., "jarvis", "jar")
    ///
    /// # Errors
    ///
    /// Returns error if no non-empty wake word remains after trimming
    pub fn new(wake_words: Vec<String>) -> Result<Self> {
        let normalized: Vec<String> = wake_words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if normalized.is_empty() {
            return Err(Error::WakeWord(
                "at least one wake word is required".to_string(),
            ));
        }

        tracing::debug!(wake_words = ?normalized, "wake word detector initialized");

        Ok(Self {
            wake_words: normalized,
        })
    }

    /// Return the first configured wake word contained in the text
    #[must_use]
    pub fn detect(&self, normalized: &str) -> Option<&str> {
        let text = normalized.to_lowercase();
        self.wake_words
            .iter()
            .find(|wake_word| text.contains(wake_word.as_str()))
            .map(String::as_str)
    }

    /// Check if the text contains any wake word
    #[must_use]
    pub fn is_wake(&self, normalized: &str) -> bool {
        self.detect(normalized).is_some()
    }

    /// Get the configured wake words
    #[must_use]
    pub fn wake_words(&self) -> &[String] {
        &self.wake_words
    }
}

impl Default for WakeWordDetector {
    fn default() -> Self {
        Self {
            wake_words: DEFAULT_WAKE_WORDS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_word_detection() {
        let detector = WakeWordDetector::default();

        assert!(detector.is_wake("hey jarvis turn on"));
        assert!(!detector.is_wake("hello there"));
    }

    #[test]
    fn test_first_configured_token_wins() {
        let detector = WakeWordDetector::default();

        assert_eq!(detector.detect("jarvis"), Some("jarvis"));
        assert_eq!(detector.detect("jarv are you there"), Some("jarv"));
        assert_eq!(detector.detect("ja"), Some("ja"));
    }

    #[test]
    fn test_substring_match_has_no_word_boundary() {
        let detector = WakeWordDetector::default();

        // Known false positive: "ja" inside an unrelated word
        assert!(detector.is_wake("open my pajamas folder"));
    }

    #[test]
    fn test_rejects_empty_configuration() {
        assert!(WakeWordDetector::new(vec![]).is_err());
        assert!(WakeWordDetector::new(vec!["   ".to_string()]).is_err());
    }

    #[test]
    fn test_wake_words_are_trimmed_and_lowercased() {
        let detector =
            WakeWordDetector::new(vec!["  Hey JARVIS ".to_string(), String::new()]).unwrap();
        assert_eq!(detector.wake_words(), &["hey jarvis"]);
        assert!(detector.is_wake("HEY JARVIS what's up"));
    }
}
