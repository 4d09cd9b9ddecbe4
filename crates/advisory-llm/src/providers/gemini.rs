//! Google Gemini advisory backend.

use std::time::Duration;

use async_trait::async_trait;
use crisis_core::{ChatMessage, Config, EffectiveLocation};
use reqwest::Client;

use crate::prompts;
use crate::protocol::{GeminiRequest, GeminiResponse};
use crate::provider::{AdvisoryBackend, AdvisoryError, Result};

/// Number of grounding sources appended to a protocol.
const MAX_VERIFIED_SOURCES: usize = 3;

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: crisis_core::config::DEFAULT_API_BASE.to_string(),
            model: crisis_core::config::DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a provider from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let provider = Self::new(config.api_key.clone().unwrap_or_default())
            .with_base_url(config.api_base())
            .with_model(config.model());
        match config.advisory_timeout() {
            Some(timeout) => provider.with_timeout(timeout),
            None => provider,
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Apply a per-request timeout. A timed-out request fails with
    /// [`AdvisoryError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => log::warn!("Failed to build HTTP client with timeout, keeping default: {}", e),
        }
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn generate_content(&self, request: &GeminiRequest) -> Result<GeminiResponse> {
        log::debug!(
            "Gemini request: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(AdvisoryError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AdvisoryError::from_transport)?;

        if !status.is_success() {
            if status == 401 || status == 403 {
                return Err(AdvisoryError::Auth(format!(
                    "Gemini authentication failed: {}. Please check your API key.",
                    body
                )));
            }
            return Err(AdvisoryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AdvisoryBackend for GeminiProvider {
    async fn generate_protocol(
        &self,
        disaster: &str,
        location: &EffectiveLocation,
        severity: &str,
    ) -> Result<String> {
        let request = GeminiRequest::from_prompt(prompts::protocol_prompt(disaster, location, severity))
            .with_system_instruction(prompts::PROTOCOL_SYSTEM_INSTRUCTION)
            .with_search_grounding()
            .with_thinking_budget(0);

        let response = self.generate_content(&request).await?;
        let text = response.text().ok_or(AdvisoryError::EmptyResponse)?;
        Ok(append_verified_sources(text, &response.source_urls()))
    }

    async fn find_resources(&self, location: &EffectiveLocation) -> Result<String> {
        let request = GeminiRequest::from_prompt(prompts::resources_prompt(location))
            .with_search_grounding()
            .with_thinking_budget(0);

        self.generate_content(&request)
            .await?
            .text()
            .ok_or(AdvisoryError::EmptyResponse)
    }

    async fn continue_chat(&self, history: &[ChatMessage], message: &str) -> Result<String> {
        let request = GeminiRequest::from_history(history, message)
            .with_system_instruction(prompts::CHAT_SYSTEM_INSTRUCTION);

        self.generate_content(&request)
            .await?
            .text()
            .ok_or(AdvisoryError::EmptyResponse)
    }
}

fn append_verified_sources(mut text: String, urls: &[String]) -> String {
    if urls.is_empty() {
        return text;
    }
    let listed: Vec<&str> = urls
        .iter()
        .take(MAX_VERIFIED_SOURCES)
        .map(String::as_str)
        .collect();
    text.push_str("\n\n**Verified Sources:**\n");
    text.push_str(&listed.join("\n"));
    text
}
