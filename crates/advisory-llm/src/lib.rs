//! advisory-llm - Clients for the emergency advisory backend
//!
//! `AdvisoryBackend` is the raw, fallible port to the backend and
//! `GeminiProvider` implements it over the Gemini REST API. `AdvisoryClient`
//! wraps any backend and turns every failure into a safe default.

pub mod client;
pub mod prompts;
pub mod protocol;
pub mod provider;
pub mod providers;
pub mod resources;

pub use client::{AdvisoryClient, CHAT_FALLBACK, PROTOCOL_FALLBACK};
pub use provider::{AdvisoryBackend, AdvisoryError, Result};
pub use providers::GeminiProvider;
pub use resources::{extract_json_array, parse_resources, MAX_RESOURCES};
