//! Text-mode collaborators: stdin in, terminal out

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::{AudioPlayer, SpeechSink, SpeechSource};
use crate::{Error, Result};

/// Reads one typed line per listen
pub struct StdinSource<R = BufReader<Stdin>> {
    lines: Lines<R>,
}

impl StdinSource {
    #[must_use]
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> StdinSource<R> {
    /// Read lines from any buffered reader instead of stdin
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> SpeechSource for StdinSource<R> {
    async fn listen(&mut self, timeout: Duration, _phrase_limit: Duration) -> Result<String> {
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Err(_) => Err(Error::RecognitionTimeout),
            Ok(Ok(Some(line))) if line.trim().is_empty() => Err(Error::RecognitionUnintelligible),
            Ok(Ok(Some(line))) => Ok(line),
            Ok(Ok(None)) => Err(Error::SourceExhausted),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(error = %e, "input line is not valid UTF-8, skipping");
                Err(Error::RecognitionUnintelligible)
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }
}

/// "Synthesizes" by passing the text through as UTF-8 bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[async_trait]
impl SpeechSink for ConsoleSink {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn audio_extension(&self) -> &'static str {
        "txt"
    }
}

/// Prints rendered text clips to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePlayer;

#[async_trait(?Send)]
impl AudioPlayer for ConsolePlayer {
    async fn play(&mut self, path: &Path) -> Result<()> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::PlaybackFailure(e.to_string()))?;
        println!("JARVIS: {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTEN: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_reads_lines_until_exhausted() {
        let mut source = StdinSource::from_reader(&b"jarvis\n   \nwhat time is it\n"[..]);

        assert_eq!(source.listen(LISTEN, LISTEN).await.unwrap(), "jarvis");
        assert!(matches!(
            source.listen(LISTEN, LISTEN).await,
            Err(Error::RecognitionUnintelligible)
        ));
        assert_eq!(source.listen(LISTEN, LISTEN).await.unwrap(), "what time is it");
        assert!(matches!(
            source.listen(LISTEN, LISTEN).await,
            Err(Error::SourceExhausted)
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_unintelligible() {
        let mut source = StdinSource::from_reader(&b"\xff\xfe caf\xe9\nshut down\n"[..]);

        let err = source.listen(LISTEN, LISTEN).await.unwrap_err();
        assert!(err.is_recognition_failure());
        assert_eq!(source.listen(LISTEN, LISTEN).await.unwrap(), "shut down");
    }

    #[tokio::test]
    async fn test_console_sink_passes_text_through() {
        let bytes = ConsoleSink.synthesize("Listening, sir.", "onyx").await.unwrap();
        assert_eq!(bytes, b"Listening, sir.");
        assert_eq!(ConsoleSink.audio_extension(), "txt");
    }

    #[tokio::test]
    async fn test_console_player_missing_file() {
        let err = ConsolePlayer
            .play(Path::new("/nonexistent/jarvis-clip.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PlaybackFailure(_)));
    }
}
