//! tooldeck - natural-language tool runner
//!
//! A request goes to a reasoning service (Gemini), which answers with either
//! a tool call or a final answer. Tool output is fed back until the model is
//! done or the iteration cap is hit.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Reasoning service abstraction with a Gemini implementation
//! - **Tools**: Tool registry with the reverse and Keynote slide tools
//! - **Agent**: Action decoding and the plan/execute loop
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use tooldeck::{Agent, Config};
//!
//! #[tokio::main]
//! async fn main() -> tooldeck::Result<()> {
//!     let agent = Agent::new(Config::load()?)?;
//!     let answer = agent.process("Reverse 'Hello World'").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, SessionOutcome};
pub use cli::Repl;
pub use core::{Config, Result, ToolError, TooldeckError};
pub use tools::ToolRegistry;
