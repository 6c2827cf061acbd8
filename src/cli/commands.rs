//! CLI commands
//!
//! Special commands that can be executed in interactive mode.

use crate::tools::ToolRegistry;

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue processing as a request
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit interactive mode
    Exit,
    /// No output needed
    None,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, tools: &ToolRegistry) -> CommandResult {
    let input = input.trim();
    let cmd = input.to_lowercase();

    match cmd.as_str() {
        "" => CommandResult::None,

        "exit" | "quit" | "q" => CommandResult::Exit,

        "help" | "?" => CommandResult::Handled(help_text()),

        "tools" => CommandResult::Handled(tools_text(tools)),

        _ => {
            if input.starts_with('/') {
                CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    input
                ))
            } else {
                CommandResult::Continue(input.to_string())
            }
        }
    }
}

/// Human-readable tool listing
pub fn tools_text(tools: &ToolRegistry) -> String {
    let mut output = String::from("Available tools:\n");
    for tool in tools.descriptors() {
        output.push_str(&format!("  {}\n    {}\n", tool.name(), tool.description()));
        for p in tool.params() {
            output.push_str(&format!(
                "    - {}: {}{}  {}\n",
                p.name,
                p.param_type,
                if p.required { "" } else { " (optional)" },
                p.description
            ));
        }
    }
    output.trim_end().to_string()
}

/// Generate help text
fn help_text() -> String {
    r#"Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  tools            List available tools
  exit, quit, q    Exit

Anything else is sent as a request, e.g.
  reverse 'Hello World' and create a Keynote slide with the reversed text
─────────────────────────────────────────────"#
        .to_string()
}
