//! Speech-to-text (STT) processing

use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::{Error, Result};

/// Response from `OpenAI` Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from Deepgram transcription API
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// STT provider backend
#[derive(Clone, Copy, Debug)]
enum SttProvider {
    Whisper,
    Deepgram,
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    provider: SttProvider,
}

impl SpeechToText {
    /// Create a new STT instance using `OpenAI` Whisper
    #[must_use]
    pub fn new_whisper(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            provider: SttProvider::Whisper,
        }
    }

    /// Create a new STT instance using Deepgram
    #[must_use]
    pub fn new_deepgram(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            provider: SttProvider::Deepgram,
        }
    }

    /// Pick a backend from the configured keys, Deepgram first
    ///
    /// # Errors
    ///
    /// Returns error if neither key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let model = config.voice.stt_model.clone();

        if let Some(key) = &config.api_keys.deepgram {
            let model = if model.starts_with("whisper") {
                "nova-2".to_string()
            } else {
                model
            };
            return Ok(Self::new_deepgram(key.clone(), model));
        }

        config
            .api_keys
            .openai
            .clone()
            .map(|key| Self::new_whisper(key, model))
            .ok_or_else(|| {
                Error::Config(
                    "OPENAI_API_KEY or DEEPGRAM_API_KEY required for speech input (or run with --text)"
                        .to_string(),
                )
            })
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match self.provider {
            SttProvider::Whisper => self.transcribe_whisper(audio).await,
            SttProvider::Deepgram => self.transcribe_deepgram(audio).await,
        }
    }

    /// Transcribe using `OpenAI` Whisper
    async fn transcribe_whisper(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("language", "en");

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;

        tracing::debug!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    /// Transcribe using Deepgram
    async fn transcribe_deepgram(&self, audio: &[u8]) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Deepgram transcription");

        let url = format!(
            "https://api.deepgram.com/v1/listen?model={}&language=en-US&punctuate=true",
            urlencoding::encode(&self.model)
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key.expose_secret()))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Deepgram API error {status}: {body}")));
        }

        let result: DeepgramResponse = response.json().await?;

        let transcript = result
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .unwrap_or_default();

        tracing::debug!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}
