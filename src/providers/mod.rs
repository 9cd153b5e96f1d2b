/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - DeepLX: single-text translation endpoint
 * - Chat: OpenAI-compatible chat completions, with batch envelopes
 * - Mock: in-process providers for tests and dry runs
 *
 * Providers never return errors to their callers. Every failure is logged
 * and collapses into "no result" (`None`, or an id missing from a batch).
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{Config, TranslationProvider};
use crate::translation::cancel::CancellationFlag;
use crate::translation::envelope::{BatchRequest, BatchResponse};

pub mod chat;
pub mod deeplx;
pub mod mock;

pub use chat::ChatCompletions;
pub use deeplx::DeepLx;

/// Fixed upper bound for one provider call
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Replacement used whenever a credential would appear in a log line
pub const REDACTED: &str = "********";

/// One text to translate
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub system_prompt: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Blank requests are answered with an empty string and never sent
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Common trait for all translation backends
///
/// `translate_one` yields `Some(text)` on success, `Some("")` for a blank
/// request, and `None` for any failure or observed cancellation.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Name used in log lines and summaries
    fn name(&self) -> &str;

    /// Whether `translate_batch` sends one request for the whole batch
    fn supports_batch(&self) -> bool {
        false
    }

    /// Translate a single text
    async fn translate_one(&self, request: &TranslationRequest) -> Option<String>;

    /// Translate several texts keyed by id.
    ///
    /// The default sends one request per entry and leaves failed entries out
    /// of the result.
    async fn translate_batch(&self, entries: &BatchRequest, target_language: &str) -> BatchResponse {
        translate_sequentially(self, entries, target_language).await
    }
}

/// Per-entry fallback for providers without native batching
pub async fn translate_sequentially<T: Translator + ?Sized>(
    translator: &T,
    entries: &BatchRequest,
    target_language: &str,
) -> BatchResponse {
    let mut result = BatchResponse::with_capacity(entries.len());
    for (id, text) in entries {
        let request = TranslationRequest::new(text.clone(), target_language);
        if let Some(translated) = translator.translate_one(&request).await {
            if !translated.is_empty() {
                result.insert(id.clone(), translated);
            }
        }
    }
    result
}

/// Replace every occurrence of a secret in a log line
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}

/// Translation provider implementation variants
#[derive(Debug)]
pub enum ProviderClient {
    /// DeepLX single-endpoint translator
    DeepLx(DeepLx),
    /// Chat-completions backend with native batching
    Chat(ChatCompletions),
}

impl ProviderClient {
    /// Build the configured provider. Missing settings are not an error here;
    /// the provider reports them per call.
    pub fn from_config(config: &Config, cancel: CancellationFlag) -> Self {
        match config.provider {
            TranslationProvider::DeepLx => Self::DeepLx(DeepLx::new(
                &config.deeplx_url,
                config.enable_logging,
                cancel,
            )),
            TranslationProvider::Chat => Self::Chat(ChatCompletions::new(
                &config.chat_base_url,
                &config.chat_api_key,
                &config.chat_model,
                &config.system_prompt,
                config.enable_logging,
                cancel,
            )),
        }
    }
}

#[async_trait]
impl Translator for ProviderClient {
    fn name(&self) -> &str {
        match self {
            Self::DeepLx(client) => client.name(),
            Self::Chat(client) => client.name(),
        }
    }

    fn supports_batch(&self) -> bool {
        match self {
            Self::DeepLx(client) => client.supports_batch(),
            Self::Chat(client) => client.supports_batch(),
        }
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Option<String> {
        match self {
            Self::DeepLx(client) => client.translate_one(request).await,
            Self::Chat(client) => client.translate_one(request).await,
        }
    }

    async fn translate_batch(&self, entries: &BatchRequest, target_language: &str) -> BatchResponse {
        match self {
            Self::DeepLx(client) => client.translate_batch(entries, target_language).await,
            Self::Chat(client) => client.translate_batch(entries, target_language).await,
        }
    }
}
