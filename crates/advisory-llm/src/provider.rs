use async_trait::async_trait;
use crisis_core::{ChatMessage, EffectiveLocation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Backend returned no text")]
    EmptyResponse,

    #[error("Request timed out")]
    Timeout,
}

impl AdvisoryError {
    /// Classify a transport error, separating timeouts from other failures.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AdvisoryError::Timeout
        } else {
            AdvisoryError::Http(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisoryError>;

/// Raw port to the advisory backend. Every call may fail; callers that must
/// not fail go through [`crate::AdvisoryClient`].
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// Generate a formatted survival protocol.
    async fn generate_protocol(
        &self,
        disaster: &str,
        location: &EffectiveLocation,
        severity: &str,
    ) -> Result<String>;

    /// Look up nearby resources. Returns the model's raw text, which is
    /// expected to contain a JSON array.
    async fn find_resources(&self, location: &EffectiveLocation) -> Result<String>;

    /// Continue the conversation given the prior turns and the new message.
    async fn continue_chat(&self, history: &[ChatMessage], message: &str) -> Result<String>;
}
