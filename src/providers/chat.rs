use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::translation::cancel::CancellationFlag;
use crate::translation::envelope::{self, BatchRequest, BatchResponse};

use super::{REDACTED, REQUEST_TIMEOUT_SECS, TranslationRequest, Translator, redact};

/// Token limit for single-text requests
pub const SINGLE_MAX_TOKENS: u32 = 1000;

/// Token limit for batch envelope requests
pub const BATCH_MAX_TOKENS: u32 = 4000;

/// Sampling temperature used for every request
pub const TEMPERATURE: f32 = 0.3;

/// Client for an OpenAI-compatible chat-completions API
#[derive(Debug)]
pub struct ChatCompletions {
    /// HTTP client for API requests
    client: Client,
    /// Base URL; requests go to `{base_url}/chat/completions`
    base_url: String,
    /// Bearer token
    api_key: String,
    /// Model identifier
    model: String,
    /// Configured system prompt, sent when not blank
    system_prompt: String,
    /// Log payloads and responses
    enable_logging: bool,
    cancel: CancellationFlag,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,
    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat completions response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: TEMPERATURE,
            max_tokens,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }
}

impl ChatCompletions {
    /// Create a new chat-completions client
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        enable_logging: bool,
        cancel: CancellationFlag,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.trim().to_string(),
            system_prompt: system_prompt.to_string(),
            enable_logging,
            cancel,
        }
    }

    fn check_settings(&self) -> Result<(), ProviderError> {
        if self.base_url.is_empty() || self.api_key.is_empty() || self.model.is_empty() {
            return Err(ProviderError::MissingSettings(
                "chat API base URL, key and model must all be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Start a request carrying the system prompts in order: per-call, then configured
    fn base_request(&self, max_tokens: u32, call_prompt: Option<&str>) -> ChatRequest {
        let mut request = ChatRequest::new(self.model.clone(), max_tokens);
        if let Some(prompt) = call_prompt.filter(|p| !p.trim().is_empty()) {
            request = request.add_message("system", prompt);
        }
        if !self.system_prompt.trim().is_empty() {
            request = request.add_message("system", self.system_prompt.clone());
        }
        request
    }

    /// Send a chat completions request
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        if self.enable_logging {
            let payload = serde_json::to_string(request).unwrap_or_default();
            info!(
                "Chat request: URL={}, Headers={{Authorization: Bearer {}}}, Payload={}",
                url,
                REDACTED,
                redact(&payload, &self.api_key)
            );
        }

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: redact(&error_text, &self.api_key),
            });
        }

        let body = response.text().await?;
        if self.enable_logging {
            info!("Chat response: {}", redact(&body, &self.api_key));
        }

        serde_json::from_str::<ChatResponse>(&body).map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Send a request between two cancellation polls and return the first choice's content
    async fn complete_text(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        if self.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let response = self.complete(request).await;

        if self.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        Self::extract_text(&response?)
    }

    /// Extract text from the first choice of a response
    pub fn extract_text(response: &ChatResponse) -> Result<String, ProviderError> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ProviderError::ParseError("response has no choices".to_string()))
    }

    async fn request_translation(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        self.check_settings()?;

        let chat_request = self
            .base_request(SINGLE_MAX_TOKENS, request.system_prompt.as_deref())
            .add_message(
                "user",
                format!(
                    "Translate the following text into {}:\n\n{}",
                    request.target_language, request.text
                ),
            );

        self.complete_text(&chat_request).await
    }

    async fn request_batch(&self, entries: &BatchRequest, target_language: &str) -> Result<BatchResponse, ProviderError> {
        self.check_settings()?;

        let envelope = envelope::build_envelope(entries);
        let chat_request = self
            .base_request(BATCH_MAX_TOKENS, None)
            .add_message("user", envelope::build_batch_prompt(&envelope, target_language));

        let content = self.complete_text(&chat_request).await?;

        envelope::parse_envelope_response(&content, entries).ok_or_else(|| {
            ProviderError::ParseError(format!("batch response is not a JSON object: {}", content))
        })
    }
}

#[async_trait]
impl Translator for ChatCompletions {
    fn name(&self) -> &str {
        "Chat completions"
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Option<String> {
        if request.is_blank() {
            return Some(String::new());
        }

        match self.request_translation(request).await {
            Ok(text) => Some(text),
            Err(ProviderError::Cancelled) => {
                debug!("Chat translation cancelled");
                None
            }
            Err(e) => {
                error!("Chat translation failed: {}", e);
                None
            }
        }
    }

    async fn translate_batch(&self, entries: &BatchRequest, target_language: &str) -> BatchResponse {
        if entries.is_empty() {
            return BatchResponse::new();
        }

        match self.request_batch(entries, target_language).await {
            Ok(translated) => translated,
            Err(ProviderError::Cancelled) => {
                debug!("Chat batch translation cancelled");
                BatchResponse::new()
            }
            Err(e) => {
                error!("Chat batch translation of {} entries failed: {}", entries.len(), e);
                BatchResponse::new()
            }
        }
    }
}
