//! TOML configuration file loading
//!
//! Supports `~/.config/jarvis/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::AppEntry;
use crate::normalize::Replacement;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct JarvisConfigFile {
    /// Conversation behaviour
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// App alias table; replaces the built-in table when present
    #[serde(default)]
    pub apps: Option<Vec<AppEntry>>,

    /// Word replacement table; replaces the built-in table when present
    #[serde(default)]
    pub replacements: Option<Vec<Replacement>>,
}

/// Conversation configuration
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    /// Wake tokens in match order
    pub wake_words: Option<Vec<String>>,

    /// Seconds of silence before the conversation window closes
    pub conversation_timeout_secs: Option<u64>,

    /// Seconds to wait for speech to begin per listen
    pub listen_timeout_secs: Option<u64>,

    /// Maximum phrase length in seconds
    pub phrase_limit_secs: Option<u64>,

    /// Voice profile used for every utterance
    pub voice: Option<String>,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// Completion token limit
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// System prompt override
    pub system_prompt: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS backend ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// Input device name; default device when unset
    pub input_device: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub deepgram: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `JarvisConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> JarvisConfigFile {
    let Some(path) = config_file_path() else {
        return JarvisConfigFile::default();
    };

    load_config_file_from(&path)
}

/// Load a TOML config file from an explicit path
///
/// Same fallback rules as [`load_config_file`].
pub fn load_config_file_from(path: &Path) -> JarvisConfigFile {
    if !path.exists() {
        return JarvisConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                JarvisConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            JarvisConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/jarvis/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("jarvis").join("config.toml"))
}
