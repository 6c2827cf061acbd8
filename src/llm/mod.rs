//! LLM module - reasoning service integrations
//!
//! Provides the provider abstraction with Gemini as the primary backend.

pub mod provider;
pub mod traits;

pub use provider::gemini::GeminiProvider;
pub use provider::scripted::{RecordedRequest, ScriptedProvider};
pub use provider::create_provider;
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
