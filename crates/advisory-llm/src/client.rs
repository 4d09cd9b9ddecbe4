//! Fault-isolating advisory client.
//!
//! During a crisis flow the session must keep moving even when the backend
//! is unreachable, so every operation here returns a usable value: the
//! backend's answer, or a fixed safe default.

use std::sync::Arc;

use crisis_core::{ChatMessage, EffectiveLocation, EmergencyResource};

use crate::provider::AdvisoryBackend;
use crate::resources::parse_resources;

pub const PROTOCOL_FALLBACK: &str = "CRITICAL ERROR: Unable to contact AI Command. \
FOLLOW STANDARD PROTOCOLS: 1. Ensure Safety. 2. Call Local Emergency Services (911/112). 3. Seek Shelter.";

pub const CHAT_FALLBACK: &str = "I am having trouble connecting. \
Please ensure you are safe and call emergency services if needed.";

#[derive(Clone)]
pub struct AdvisoryClient {
    backend: Arc<dyn AdvisoryBackend>,
}

impl AdvisoryClient {
    pub fn new(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self { backend }
    }

    /// Survival protocol text; never empty.
    pub async fn request_protocol(
        &self,
        disaster: &str,
        location: &EffectiveLocation,
        severity: &str,
    ) -> String {
        match self.backend.generate_protocol(disaster, location, severity).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::error!("Advisory protocol error: backend returned empty text");
                PROTOCOL_FALLBACK.to_string()
            }
            Err(e) => {
                log::error!("Advisory protocol error: {}", e);
                PROTOCOL_FALLBACK.to_string()
            }
        }
    }

    /// Nearby resources; empty on any failure.
    pub async fn request_resources(&self, location: &EffectiveLocation) -> Vec<EmergencyResource> {
        match self.backend.find_resources(location).await {
            Ok(text) => parse_resources(&text),
            Err(e) => {
                log::error!("Advisory resources error: {}", e);
                Vec::new()
            }
        }
    }

    /// Next specialist reply given the prior turns; never empty.
    pub async fn continue_chat(&self, prior: &[ChatMessage], message: &str) -> String {
        match self.backend.continue_chat(prior, message).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::error!("Advisory chat error: backend returned empty text");
                CHAT_FALLBACK.to_string()
            }
            Err(e) => {
                log::error!("Advisory chat error: {}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }
}
