//! Tools module - Tool implementations for the agent
//!
//! Contains the reverse and Keynote slide tools, and the tool registry.

pub mod registry;
pub mod slides;
pub mod text;

pub use registry::{Handler, ToolDescriptor, ToolRegistry};
pub use slides::{KeynoteSlideTool, OsaScript, ScriptError, ScriptRunner};
pub use text::ReverseTool;
