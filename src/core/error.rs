//! Custom error types for tooldeck
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Boxed error used as the cause of a tool execution failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for tooldeck operations
#[derive(Error, Debug)]
pub enum TooldeckError {
    /// The reasoning service replied with something that is not an action
    #[error("Planning error: {0}")]
    Planning(String),

    /// The loop ran out of planning rounds without a final answer
    #[error("Maximum iterations exceeded: no final answer after {limit} planning rounds")]
    MaxIterationsExceeded { limit: usize },

    /// A required credential is not set
    #[error("{0} not found in environment variables")]
    MissingCredential(&'static str),

    /// Reasoning service errors (bad status, unusable reply)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool registry errors surfaced directly to the caller
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for tooldeck operations
pub type Result<T> = std::result::Result<T, TooldeckError>;

impl TooldeckError {
    /// Create a planning error
    pub fn planning(msg: impl Into<String>) -> Self {
        Self::Planning(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error ended a planning session (as opposed to a transport
    /// or startup failure)
    pub fn is_loop_guard(&self) -> bool {
        matches!(self, Self::Planning(_) | Self::MaxIterationsExceeded { .. })
    }
}

/// Errors returned by the tool registry
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Execution of {tool} failed: {source}")]
    ExecutionFailure {
        tool: String,
        #[source]
        source: BoxError,
    },

    #[error("Tool already registered: {name}")]
    AlreadyRegistered { name: String },
}

impl ToolError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn invalid(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn execution(tool: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ExecutionFailure {
            tool: tool.into(),
            source: source.into(),
        }
    }
}
