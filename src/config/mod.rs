//! Configuration management for the Jarvis assistant
//!
//! Every value resolves as env > TOML file > built-in default, once at
//! startup. Nothing is reloaded while the assistant runs.

mod apps;
pub mod file;

use std::time::Duration;

use secrecy::SecretString;

pub use apps::{AppEntry, AppRegistry};

use crate::conversation::DEFAULT_CONVERSATION_TIMEOUT;
use crate::normalize::WordReplacementTable;
use crate::voice::DEFAULT_WAKE_WORDS;
use crate::{Error, Result};

/// Default system prompt for the AI fallback
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are JARVIS, a helpful voice assistant. \
Answer in English in at most two or three short sentences. Only state facts you are \
sure of; if you don't know, say so instead of guessing.";

/// Assistant configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Conversation behaviour
    pub assistant: AssistantConfig,

    /// AI fallback settings
    pub llm: LlmConfig,

    /// Voice processing configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// App aliases for the launch intent
    pub apps: AppRegistry,

    /// Variant folding applied to every transcript
    pub replacements: WordReplacementTable,
}

/// Conversation configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Wake tokens in match order
    pub wake_words: Vec<String>,

    /// Inactivity window before returning to idle
    pub conversation_timeout: Duration,

    /// How long a listen waits for speech to start
    pub listen_timeout: Duration,

    /// Maximum phrase duration per listen
    pub phrase_limit: Duration,

    /// Voice profile for every utterance
    pub voice: String,
}

/// AI fallback configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chat model identifier
    pub model: String,

    /// Completion token limit
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// System prompt sent with every question
    pub system_prompt: String,
}

/// TTS backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsProvider {
    /// `OpenAI` speech endpoint
    OpenAi,
    /// `ElevenLabs` text-to-speech
    ElevenLabs,
}

impl TtsProvider {
    /// Parse a provider name
    ///
    /// # Errors
    ///
    /// Returns error for unknown provider names
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "elevenlabs" => Ok(Self::ElevenLabs),
            other => Err(Error::Config(format!("unknown TTS provider: {other}"))),
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS backend
    pub tts_provider: TtsProvider,

    /// Input device name, default device when unset
    pub input_device: Option<String>,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper, TTS and chat)
    pub openai: Option<SecretString>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<SecretString>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<SecretString>,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed file and an env lookup
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn from_sources(
        fc: file::JarvisConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // API keys (env > toml > None)
        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY")
                .or(fc.api_keys.openai)
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            elevenlabs: env("ELEVENLABS_API_KEY")
                .or(fc.api_keys.elevenlabs)
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            deepgram: env("DEEPGRAM_API_KEY")
                .or(fc.api_keys.deepgram)
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
        };

        let defaults = Self::default();

        // Conversation (env > toml > default)
        let wake_words = env("JARVIS_WAKE_WORDS")
            .map(|s| s.split(',').map(|w| w.trim().to_string()).collect())
            .or(fc.assistant.wake_words)
            .unwrap_or(defaults.assistant.wake_words);

        let conversation_timeout_secs = match env("JARVIS_CONVERSATION_TIMEOUT") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("invalid JARVIS_CONVERSATION_TIMEOUT {raw:?}: {e}"))
            })?,
            None => fc
                .assistant
                .conversation_timeout_secs
                .unwrap_or(defaults.assistant.conversation_timeout.as_secs()),
        };

        let assistant = AssistantConfig {
            wake_words,
            conversation_timeout: Duration::from_secs(conversation_timeout_secs),
            listen_timeout: fc
                .assistant
                .listen_timeout_secs
                .map_or(defaults.assistant.listen_timeout, Duration::from_secs),
            phrase_limit: fc
                .assistant
                .phrase_limit_secs
                .map_or(defaults.assistant.phrase_limit, Duration::from_secs),
            voice: env("JARVIS_VOICE")
                .or(fc.assistant.voice)
                .unwrap_or(defaults.assistant.voice),
        };

        if assistant.phrase_limit.is_zero() {
            return Err(Error::Config("phrase_limit_secs must be positive".to_string()));
        }

        let llm = LlmConfig {
            model: env("JARVIS_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or(defaults.llm.model),
            max_tokens: fc.llm.max_tokens.unwrap_or(defaults.llm.max_tokens),
            temperature: fc.llm.temperature.unwrap_or(defaults.llm.temperature),
            system_prompt: fc.llm.system_prompt.unwrap_or(defaults.llm.system_prompt),
        };

        let tts_provider = fc
            .voice
            .tts_provider
            .as_deref()
            .map_or(Ok(TtsProvider::OpenAi), TtsProvider::parse)?;

        let voice = VoiceConfig {
            stt_model: env("JARVIS_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(defaults.voice.stt_model),
            tts_model: env("JARVIS_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| match tts_provider {
                    TtsProvider::OpenAi => "tts-1".to_string(),
                    TtsProvider::ElevenLabs => "eleven_monolingual_v1".to_string(),
                }),
            tts_provider,
            input_device: fc.voice.input_device,
        };

        let apps = fc.apps.map_or_else(AppRegistry::default, AppRegistry::new);
        let replacements = fc
            .replacements
            .map_or_else(WordReplacementTable::default, WordReplacementTable::new);

        Ok(Self {
            assistant,
            llm,
            voice,
            api_keys,
            apps,
            replacements,
        })
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_words: DEFAULT_WAKE_WORDS.iter().map(ToString::to_string).collect(),
            conversation_timeout: DEFAULT_CONVERSATION_TIMEOUT,
            listen_timeout: Duration::from_secs(10),
            phrase_limit: Duration::from_secs(5),
            voice: "onyx".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_provider: TtsProvider::OpenAi,
            input_device: None,
        }
    }
}
