//! LLM Provider implementations and factory
//!
//! Submodules implement specific providers (Gemini, scripted replay).

pub mod gemini;
pub mod scripted;

use std::sync::Arc;

use tracing::info;

use crate::core::config::Config;
use crate::core::Result;
use crate::llm::traits::LLMProvider;

use self::gemini::GeminiProvider;

/// Create the reasoning service provider from configuration
pub fn create_provider(config: &Config) -> Result<Arc<dyn LLMProvider>> {
    let provider = GeminiProvider::from_config(config)?;
    info!(
        model = %config.gemini.model,
        api_key = %config.masked_api_key(),
        "Initialized Gemini provider"
    );
    Ok(Arc::new(provider))
}
