//! Action decoding
//!
//! Turns one reasoning-service reply into exactly one instruction. Decoding is
//! strict: anything outside the line protocol is a planning error.

use crate::core::{Result, TooldeckError};

pub const FUNCTION_CALL: &str = "FUNCTION_CALL:";
pub const FINAL_ANSWER: &str = "FINAL_ANSWER:";
/// Older direct-response marker, accepted as a final answer
pub const NO_TOOLS_NEEDED: &str = "NO_TOOLS_NEEDED:";

/// One decoded decision from the reasoning service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionInstruction {
    /// Invoke a tool; `arguments` are positional and bound to parameter
    /// names by the registry
    CallTool { name: String, arguments: Vec<String> },
    /// The task is complete
    FinalAnswer { text: String },
}

impl ActionInstruction {
    /// Decode a reply
    ///
    /// Accepted forms, after trimming surrounding whitespace:
    /// - `FUNCTION_CALL: name|arg1|arg2` on a single line
    /// - `FINAL_ANSWER: text` (text may span lines)
    /// - `NO_TOOLS_NEEDED: text`
    pub fn parse(reply: &str) -> Result<Self> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(TooldeckError::planning("empty response from model"));
        }

        if let Some(rest) = reply.strip_prefix(FUNCTION_CALL) {
            return Self::parse_call(rest);
        }

        for prefix in [FINAL_ANSWER, NO_TOOLS_NEEDED] {
            if let Some(rest) = reply.strip_prefix(prefix) {
                let text = rest.trim();
                if text.is_empty() {
                    return Err(TooldeckError::planning(format!("{} with no text", prefix)));
                }
                if let Some(extra) = text
                    .lines()
                    .skip(1)
                    .map(str::trim_start)
                    .find(|line| starts_with_marker(line))
                {
                    return Err(TooldeckError::planning(format!(
                        "more than one instruction in reply: {}",
                        preview(extra)
                    )));
                }
                return Ok(Self::FinalAnswer {
                    text: text.to_string(),
                });
            }
        }

        Err(TooldeckError::planning(format!(
            "expected {} or {}, got: {}",
            FUNCTION_CALL,
            FINAL_ANSWER,
            preview(reply)
        )))
    }

    fn parse_call(rest: &str) -> Result<Self> {
        if rest.contains('\n') {
            return Err(TooldeckError::planning(
                "FUNCTION_CALL must be a single line",
            ));
        }

        let mut parts = rest.split('|');
        let name = parts.next().unwrap_or_default().trim();

        if name.is_empty() {
            return Err(TooldeckError::planning("FUNCTION_CALL without a tool name"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(TooldeckError::planning(format!(
                "invalid tool name in FUNCTION_CALL: {}",
                preview(name)
            )));
        }

        Ok(Self::CallTool {
            name: name.to_string(),
            arguments: parts.map(|p| p.trim().to_string()).collect(),
        })
    }
}

fn starts_with_marker(line: &str) -> bool {
    [FUNCTION_CALL, FINAL_ANSWER, NO_TOOLS_NEEDED]
        .iter()
        .any(|marker| line.starts_with(marker))
}

/// First line of a reply, shortened for error messages
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > 80 {
        format!("{}...", line.chars().take(80).collect::<String>())
    } else {
        line.to_string()
    }
}
