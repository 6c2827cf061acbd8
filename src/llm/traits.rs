//! LLM Provider trait for abstracting the reasoning service
//!
//! The planner only needs text in, text out; providers own transport details.

use async_trait::async_trait;

use crate::core::{Result, Turn};

/// One planning reply
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Reply text, expected to hold a single action line
    pub content: String,
    pub usage: Option<TokenUsage>,
    /// Model that answered
    pub model: String,
}

/// Token counts reported by the service, when it reports them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Per-request sampling overrides; `None` leaves the service default
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    /// Output token ceiling
    pub max_tokens: Option<u32>,
}

/// Trait for reasoning service providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a reply from system instructions and the conversation so far
    async fn chat(
        &self,
        system: &str,
        history: &[Turn],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse>;

    /// Model used for requests
    fn model(&self) -> &str;

    /// Get the provider name
    fn name(&self) -> &str;
}
