//! `OpenAI` chat completions as the free-form question fallback

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::AiOracle;
use crate::config::LlmConfig;
use crate::{Error, Result};

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(serde::Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Answers questions through the `OpenAI` chat completions API
pub struct OpenAiOracle {
    client: reqwest::Client,
    api_key: SecretString,
    llm: LlmConfig,
}

impl OpenAiOracle {
    /// Create a new oracle
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(api_key: SecretString, llm: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            llm,
        })
    }
}

#[async_trait]
impl AiOracle for OpenAiOracle {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.llm.model, prompt, "asking AI oracle");

        let request = ChatRequest {
            model: &self.llm.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.llm.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::OracleUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OracleUnavailable(format!(
                "chat completion error {status}: {body}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::OracleUnavailable(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::OracleUnavailable("empty completion".to_string()))
    }
}
