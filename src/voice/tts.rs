//! Text-to-speech (TTS) processing

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{Config, TtsProvider};
use crate::services::SpeechSink;
use crate::{Error, Result};

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    speed: f32,
    model: String,
    provider: TtsProvider,
}

impl TextToSpeech {
    /// Create a new TTS instance using `OpenAI` with custom model
    #[must_use]
    pub fn new_openai(api_key: SecretString, model: String, speed: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            speed,
            model,
            provider: TtsProvider::OpenAi,
        }
    }

    /// Create a new TTS instance using `ElevenLabs` with custom model
    ///
    /// The voice profile of each utterance is used as the `ElevenLabs` voice ID.
    #[must_use]
    pub fn new_elevenlabs(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            speed: 1.0,
            model,
            provider: TtsProvider::ElevenLabs,
        }
    }

    /// Create the configured TTS backend
    ///
    /// # Errors
    ///
    /// Returns error if the backend's API key is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.voice.tts_provider {
            TtsProvider::OpenAi => {
                let key = config.api_keys.openai.clone().ok_or_else(|| {
                    Error::Config(
                        "OpenAI API key required for TTS (or run with --text)".to_string(),
                    )
                })?;
                Ok(Self::new_openai(key, config.voice.tts_model.clone(), 1.0))
            }
            TtsProvider::ElevenLabs => {
                let key = config.api_keys.elevenlabs.clone().ok_or_else(|| {
                    Error::Config("ElevenLabs API key required for TTS".to_string())
                })?;
                Ok(Self::new_elevenlabs(key, config.voice.tts_model.clone()))
            }
        }
    }

    /// Synthesize using `OpenAI` TTS
    async fn synthesize_openai(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::SynthesisFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SynthesisFailure(format!(
                "OpenAI TTS error {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::SynthesisFailure(e.to_string()))?;
        Ok(audio.to_vec())
    }

    /// Synthesize using `ElevenLabs` TTS
    async fn synthesize_elevenlabs(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            urlencoding::encode(voice)
        );

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::SynthesisFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SynthesisFailure(format!(
                "ElevenLabs TTS error {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::SynthesisFailure(e.to_string()))?;
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechSink for TextToSpeech {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        tracing::debug!(chars = text.len(), voice, provider = ?self.provider, "synthesizing");
        match self.provider {
            TtsProvider::OpenAi => self.synthesize_openai(text, voice).await,
            TtsProvider::ElevenLabs => self.synthesize_elevenlabs(text, voice).await,
        }
    }
}
