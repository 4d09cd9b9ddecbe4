//! Wire types for the advisory backend.

pub mod gemini;

pub use gemini::{
    GeminiCandidate, GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GeminiTool,
    GenerationConfig, GoogleSearch, GroundingChunk, GroundingMetadata, ThinkingConfig, WebSource,
};
