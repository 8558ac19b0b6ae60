//! LLM Provider implementations
//!
//! ## Architecture
//!
//! Real providers go through the `genai` crate, which handles:
//! - Streaming SSE parsing
//! - Provider-specific protocols (Gemini, OpenAI, Anthropic, etc.)
//! - Tool calling
//!
//! Providers not natively in genai (OpenRouter, Mistral) are handled via
//! genai's `ServiceTargetResolver` using OpenAI-compatible protocols.
//!
//! The `MockProvider` is kept for testing and offline demos.

mod error;
mod genai_adapter;
mod genai_provider;
mod mock;
mod traits;

// Core traits and types
pub use error::{ProviderError, ProviderResult};
pub use traits::{ChatOptions, Provider, ProviderModelConfig};

// The main provider - handles all LLM providers via genai
pub use genai_adapter::{is_genai_native, is_genai_supported, ProviderConfig, ResponseCollector};
pub use genai_provider::GenaiProvider;

// Mock provider for testing
pub use mock::{MockMode, MockProvider, MockReply};

use crate::logging::Logger;
use std::sync::Arc;

/// Create a provider for the given provider ID
///
/// `mock` yields an echoing [`MockProvider`]; everything else goes through
/// [`GenaiProvider`], with unknown IDs treated as OpenAI-compatible.
pub fn create_provider(provider_id: &str, logger: Arc<dyn Logger>) -> Arc<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Arc::new(MockProvider::echo(logger)),
        id => Arc::new(GenaiProvider::new(id, logger)),
    }
}

/// List all supported provider IDs
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        // Native genai providers
        "gemini",
        "openai",
        "anthropic",
        "ollama",
        "groq",
        "xai",
        "deepseek",
        "cohere",
        "fireworks",
        "together",
        // OpenAI-compatible providers via resolver
        "openrouter",
        "mistral",
        // Testing
        "mock",
    ]
}
