//! Configuration management for tooldeck
//!
//! Supports environment variables, a config file, and runtime overrides.
//! Priority: CLI args > env vars > config file > defaults.
//!
//! Config file location: ~/.config/tooldeck/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, TooldeckError};

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Main configuration for tooldeck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reasoning service configuration
    pub gemini: GeminiConfig,
    /// Planner/executor loop configuration
    pub agent: AgentConfig,
    /// Keynote slide tool configuration
    pub slides: SlideConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key, only ever read from the environment
    #[serde(skip, default = "api_key_from_env")]
    pub api_key: Option<String>,
    /// Model name (default: gemini-1.5-flash)
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature; kept low so replies stay in the action format
    pub temperature: f32,
    /// Cap on tokens per planning reply (unset: service default)
    pub max_output_tokens: Option<u32>,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum planning rounds per request before giving up
    /// Default: 10
    pub max_iterations: usize,
    /// Whether to show debug output
    pub debug: bool,
    /// Extra instructions placed ahead of the tool protocol
    pub system_prompt: Option<String>,
}

/// Layout of the slide created by `create_keynote_slide`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Keynote document theme
    pub theme: String,
    /// Master slide used for the new slide
    pub master_slide: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Seconds to wait for Keynote to create the document
    pub launch_delay_secs: f32,
}

fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty())
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: api_key_from_env(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
            temperature: 0.1,
            max_output_tokens: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            debug: false,
            system_prompt: None,
        }
    }
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            theme: "White".to_string(),
            master_slide: "Blank".to_string(),
            x: 100,
            y: 100,
            width: 400,
            height: 200,
            launch_delay_secs: 1.0,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tooldeck")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from .env, the config file, and the environment
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let path = Self::config_file();
        let mut config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| TooldeckError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing fields take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TooldeckError::config(format!("Failed to parse config: {}", e)))
    }

    /// Apply environment overrides using the given lookup
    ///
    /// A set but unparsable `TOOLDECK_MAX_ITERATIONS` is rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = lookup("TOOLDECK_MODEL").filter(|m| !m.trim().is_empty()) {
            self.gemini.model = model;
        }
        if let Some(max) = lookup("TOOLDECK_MAX_ITERATIONS") {
            self.agent.max_iterations = max.trim().parse().map_err(|_| {
                TooldeckError::config(format!(
                    "TOOLDECK_MAX_ITERATIONS must be a positive integer, got '{}'",
                    max
                ))
            })?;
        }
        if let Some(debug) = lookup("TOOLDECK_DEBUG") {
            self.agent.debug = debug == "true" || debug == "1";
        }
        Ok(())
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(TooldeckError::config("agent.max_iterations must be at least 1"));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(TooldeckError::config("gemini.timeout_secs must be positive"));
        }
        url::Url::parse(&self.gemini.base_url).map_err(|e| {
            TooldeckError::config(format!("Invalid gemini.base_url '{}': {}", self.gemini.base_url, e))
        })?;
        Ok(())
    }

    /// The API key, or a startup error naming the missing variable
    pub fn api_key(&self) -> Result<&str> {
        self.gemini
            .api_key
            .as_deref()
            .ok_or(TooldeckError::MissingCredential(API_KEY_VAR))
    }

    /// Redacted form of the API key for logs
    pub fn masked_api_key(&self) -> String {
        match self.gemini.api_key.as_deref() {
            Some(key) => format!("{}***", key.chars().take(4).collect::<String>()),
            None => "<unset>".to_string(),
        }
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.agent.max_iterations, 10);
        assert_eq!(config.slides.theme, "White");
        assert_eq!(config.slides.width, 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = Config::from_toml_str(
            r#"
            [agent]
            max_iterations = 3

            [slides]
            theme = "Black"
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.max_iterations, 3);
        assert_eq!(config.slides.theme, "Black");
        assert_eq!(config.slides.master_slide, "Blank");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gemini]\nmodel = \"gemini-2.0-flash\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[agent\nmax_iterations = ").unwrap_err();
        assert!(matches!(err, TooldeckError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GOOGLE_API_KEY", "AIzaSecretKey"),
            ("TOOLDECK_MODEL", "gemini-pro"),
            ("TOOLDECK_MAX_ITERATIONS", "4"),
            ("TOOLDECK_DEBUG", "1"),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_key().unwrap(), "AIzaSecretKey");
        assert_eq!(config.masked_api_key(), "AIza***");
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.agent.max_iterations, 4);
        assert!(config.agent.debug);
    }

    #[test]
    fn test_unparsable_iteration_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "TOOLDECK_MAX_ITERATIONS").then(|| "abc".to_string()))
            .unwrap_err();

        assert!(matches!(err, TooldeckError::Config(_)));
        assert!(err.to_string().contains("'abc'"));
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        config.gemini.api_key = None;
        let err = config.api_key().unwrap_err();
        assert!(matches!(err, TooldeckError::MissingCredential("GOOGLE_API_KEY")));
        assert_eq!(config.masked_api_key(), "<unset>");
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let mut config = Config::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.gemini.api_key = Some("AIzaSecretKey".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("AIzaSecretKey"));
        assert!(toml_str.contains("max_iterations"));
    }
}
