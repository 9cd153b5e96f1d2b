use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the flat key-value configuration: defaults for every
/// key, merging persisted overrides over them, validation and saving.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which backend translates
    pub provider: TranslationProvider,

    /// Base URL of the DeepLX server (`{base}/translate` is called)
    pub deeplx_url: String,

    /// Base URL of the chat-completions API (`{base}/chat/completions` is called)
    pub chat_base_url: String,

    /// Bearer token for the chat-completions API
    pub chat_api_key: String,

    /// Model identifier sent with chat requests
    pub chat_model: String,

    /// Target language display name (see `language_utils`)
    pub target_language: String,

    /// Log outbound requests and inbound responses of providers
    pub enable_logging: bool,

    /// Entries per batch envelope for providers with native batching
    pub batch_size: usize,

    /// System prompt added to every chat request when not blank
    pub system_prompt: String,

    /// System prompt for whole-document translation.
    /// Placeholder: {target_language}
    pub text_file_prompt: String,

    /// File format used by the previous run
    pub last_file_type: FileType,

    /// Log verbosity level
    pub log_level: LogLevel,

    /// Mirror log records into logs/translator_YYYYMMDD.log
    pub log_to_file: bool,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepLX single-endpoint translator
    #[default]
    DeepLx,
    // @provider: OpenAI-compatible chat completions with batch envelopes
    Chat,
}

impl TranslationProvider {
    // @returns: Human readable provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepLx => "DeepLX",
            Self::Chat => "Chat completions",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepLx => "deeplx".to_string(),
            Self::Chat => "chat".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deeplx" => Ok(Self::DeepLx),
            "chat" | "chatgpt" | "openai" => Ok(Self::Chat),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Supported input formats
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// XML resource file with `data`/`value` entries
    #[default]
    Resx,
    /// Any text file translated as a whole document
    Text,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resx => write!(f, "resx"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "resx" => Ok(Self::Resx),
            "text" | "ts" => Ok(Self::Text),
            _ => Err(anyhow!("Invalid file type: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_chat_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_chat_model() -> String {
    "gemma3:27b".to_string()
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_system_prompt() -> String {
    "You are an experienced translator. Translate the given text into the target language \
     accurately and fluently, following the conventions of the target locale. \
     Keep the meaning, tone and level of formality of the original, prefer established \
     domain terminology over literal word-for-word renderings, and keep grammar, spelling \
     and punctuation correct. Return exactly one translation and nothing else."
        .to_string()
}

fn default_text_file_prompt() -> String {
    "You are translating a source file into {target_language}. Translate only the \
     human-readable string values. Keep every key, identifier, comment marker, bracket, \
     quote and separator exactly as it is so the file stays syntactically valid. \
     Return the complete translated file and nothing else."
        .to_string()
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: TranslationProvider::default(),
            deeplx_url: String::new(),
            chat_base_url: default_chat_base_url(),
            chat_api_key: String::new(),
            chat_model: default_chat_model(),
            target_language: default_target_language(),
            enable_logging: false,
            batch_size: default_batch_size(),
            system_prompt: default_system_prompt(),
            text_file_prompt: default_text_file_prompt(),
            last_file_type: FileType::default(),
            log_level: LogLevel::default(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Default location of the persisted configuration
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resource_translator.json")
    }

    /// Load the persisted configuration, falling back to defaults.
    ///
    /// Keys missing from the file take their default value. A missing file or
    /// a parse failure yields the full default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        let parsed = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))
            .and_then(|content| {
                serde_json::from_str::<Config>(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))
            });

        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Self::default()
            }
        }
    }

    /// Persist the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &json)
    }

    /// Record the format of the last job in an existing config file.
    ///
    /// Returns whether the file was rewritten. A missing file is left missing.
    pub fn remember_file_type<P: AsRef<Path>>(path: P, file_type: FileType) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }

        let mut persisted = Self::load(path);
        if persisted.last_file_type == file_type {
            return Ok(false);
        }
        persisted.last_file_type = file_type;
        persisted.save(path)?;
        Ok(true)
    }

    /// Validate the configuration for the selected provider
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required"));
        }

        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        match self.provider {
            TranslationProvider::DeepLx => {
                if self.deeplx_url.trim().is_empty() {
                    return Err(anyhow!("DeepLX URL is required for the DeepLX provider"));
                }
                validate_url(&self.deeplx_url)?;
            }
            TranslationProvider::Chat => {
                if self.chat_base_url.trim().is_empty() {
                    return Err(anyhow!("API base URL is required for the chat provider"));
                }
                validate_url(&self.chat_base_url)?;
                if self.chat_api_key.trim().is_empty() {
                    return Err(anyhow!("API key is required for the chat provider"));
                }
                if self.chat_model.trim().is_empty() {
                    return Err(anyhow!("Model name is required for the chat provider"));
                }
            }
        }

        Ok(())
    }

    /// Set a single key from its string form, as used by `config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "provider" => self.provider = value.parse()?,
            "deeplx_url" => self.deeplx_url = value.to_string(),
            "chat_base_url" => self.chat_base_url = value.to_string(),
            "chat_api_key" => self.chat_api_key = value.to_string(),
            "chat_model" => self.chat_model = value.to_string(),
            "target_language" => self.target_language = value.to_string(),
            "enable_logging" => {
                self.enable_logging = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got {}", value))?
            }
            "batch_size" => {
                self.batch_size = value
                    .parse()
                    .with_context(|| format!("Expected a positive number, got {}", value))?
            }
            "system_prompt" => self.system_prompt = value.to_string(),
            "text_file_prompt" => self.text_file_prompt = value.to_string(),
            "last_file_type" => self.last_file_type = value.parse()?,
            "log_level" => self.log_level = value.parse()?,
            "log_to_file" => {
                self.log_to_file = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got {}", value))?
            }
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        }
        Ok(())
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.chat_api_key.is_empty() {
            copy.chat_api_key = "********".to_string();
        }
        copy
    }

    /// Whole-document prompt with the target language filled in
    pub fn text_file_prompt_for(&self, target_language: &str) -> String {
        self.text_file_prompt
            .replace("{target_language}", target_language)
    }
}

fn validate_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("Unsupported URL scheme '{}' in {}", other, raw)),
    }
}
