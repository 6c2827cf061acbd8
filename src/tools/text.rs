//! Reverse string tool

use serde_json::Value;

use crate::core::{ParamSpec, ParamType};
use crate::tools::registry::ToolDescriptor;

/// Tool for reversing text
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseTool;

impl ReverseTool {
    /// Create a new reverse tool
    pub fn new() -> Self {
        Self
    }

    /// Reverse by Unicode scalar value
    pub fn reverse(&self, text: &str) -> String {
        text.chars().rev().collect()
    }

    /// Registry entry for `reverse_string`
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new("reverse_string", "Reverse a given string.", move |args| {
            let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
            Ok(self.reverse(text))
        })
        .param(ParamSpec::required(
            "text",
            ParamType::String,
            "The text to reverse",
        ))
    }
}
