//! Google Gemini provider
//!
//! Calls the Generative Language `generateContent` endpoint with an API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::{Config, Result, Role, TooldeckError, Turn};
use crate::llm::traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};

/// Gemini API client
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Only text parts are produced or read; other part kinds deserialize empty
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GeminiProvider {
    /// Create a provider from configuration; fails without an API key
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.gemini.model.clone(),
            endpoint: Self::endpoint(&config.gemini.base_url, &config.gemini.model)?,
            temperature: config.gemini.temperature,
        })
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn endpoint(base_url: &str, model: &str) -> Result<Url> {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Url::parse(&base)
            .and_then(|b| b.join(&format!("v1beta/models/{}:generateContent", model)))
            .map_err(|e| TooldeckError::config(format!("Invalid Gemini endpoint: {}", e)))
    }

    fn build_request(
        &self,
        system: &str,
        history: &[Turn],
        options: Option<GenerateOptions>,
    ) -> GenerateContentRequest {
        let options = options.unwrap_or_default();

        let system_instruction = (!system.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: Some(system.to_string()),
            }],
        });

        // Gemini only knows user and model; observations go back as user text
        let contents = history
            .iter()
            .map(|turn| {
                let (role, text) = match turn.role {
                    Role::User => ("user", turn.content.clone()),
                    Role::Model => ("model", turn.content.clone()),
                    Role::Tool => ("user", format!("Observation: {}", turn.content)),
                };
                Content {
                    role: Some(role.to_string()),
                    parts: vec![Part { text: Some(text) }],
                }
            })
            .collect();

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: Some(options.temperature.unwrap_or(self.temperature)),
                max_output_tokens: options.max_tokens,
                candidate_count: 1,
            },
        }
    }

    fn to_llm_response(response: GenerateContentResponse, model: &str) -> Result<LLMResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| TooldeckError::provider("Gemini returned no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        // A candidate without text cannot be decoded into an action
        if text.trim().is_empty() {
            return Err(TooldeckError::planning(format!(
                "empty response from model (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(LLMResponse {
            content: text,
            usage,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
        })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat(
        &self,
        system: &str,
        history: &[Turn],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let request = self.build_request(system, history, options);
        debug!(model = %self.model, turns = history.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TooldeckError::provider(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let reply = Self::to_llm_response(body, &self.model)?;

        if let Some(ref usage) = reply.usage {
            debug!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = usage.total_tokens,
                "Gemini token usage"
            );
        }

        Ok(reply)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
