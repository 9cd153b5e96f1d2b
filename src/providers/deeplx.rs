use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::translation::cancel::CancellationFlag;

use super::{REQUEST_TIMEOUT_SECS, TranslationRequest, Translator};

/// DeepLX client: one text per request, no native batching
#[derive(Debug)]
pub struct DeepLx {
    /// HTTP client for API requests
    client: Client,
    /// Base URL; requests go to `{base_url}/translate`
    base_url: String,
    /// Log payloads and responses
    enable_logging: bool,
    cancel: CancellationFlag,
}

/// DeepLX translate request
#[derive(Debug, Serialize)]
pub struct DeepLxRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// DeepLX translate response
#[derive(Debug, Deserialize)]
pub struct DeepLxResponse {
    /// Translated text
    pub data: Option<String>,
    /// Status code echoed by some DeepLX builds
    #[serde(default)]
    pub code: Option<i64>,
}

impl DeepLx {
    /// Create a new DeepLX client
    pub fn new(base_url: &str, enable_logging: bool, cancel: CancellationFlag) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            enable_logging,
            cancel,
        }
    }

    /// Send one translate request
    pub async fn complete(&self, request: &DeepLxRequest) -> Result<DeepLxResponse, ProviderError> {
        let url = format!("{}/translate", self.base_url);

        if self.enable_logging {
            info!(
                "DeepLX request: URL={}, Payload={}",
                url,
                serde_json::to_string(request).unwrap_or_default()
            );
        }

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        if self.enable_logging {
            info!("DeepLX response: {}", body);
        }

        serde_json::from_str::<DeepLxResponse>(&body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn request_translation(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        if self.base_url.is_empty() {
            return Err(ProviderError::MissingSettings("DeepLX URL is not set".to_string()));
        }

        if self.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let payload = DeepLxRequest {
            text: request.text.clone(),
            source_lang: "auto".to_string(),
            target_lang: language_utils::get_language_code(&request.target_language),
        };
        let response = self.complete(&payload).await;

        if self.cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        response?
            .data
            .ok_or_else(|| ProviderError::ParseError("response has no 'data' field".to_string()))
    }
}

#[async_trait]
impl Translator for DeepLx {
    fn name(&self) -> &str {
        "DeepLX"
    }

    async fn translate_one(&self, request: &TranslationRequest) -> Option<String> {
        if request.is_blank() {
            return Some(String::new());
        }

        match self.request_translation(request).await {
            Ok(text) => Some(text),
            Err(ProviderError::Cancelled) => {
                debug!("DeepLX translation cancelled");
                None
            }
            Err(e) => {
                error!("DeepLX translation failed: {}", e);
                None
            }
        }
    }
}
