//! Keynote slide tool
//!
//! Creates a Keynote document with one slide holding the given text, driven
//! through AppleScript. The script runner is a trait so the slide logic can
//! be exercised without Keynote.

use std::process::Command;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::core::config::SlideConfig;
use crate::core::{ParamSpec, ParamType};
use crate::tools::registry::ToolDescriptor;

/// Errors from running an AppleScript
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to launch osascript (AppleScript requires macOS): {0}")]
    Launch(#[from] std::io::Error),

    #[error("osascript exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Runs AppleScript source and returns its stdout
pub trait ScriptRunner: Send + Sync {
    fn run(&self, script: &str) -> Result<String, ScriptError>;
}

/// Runs scripts through the system `osascript` binary
#[derive(Debug, Clone, Copy, Default)]
pub struct OsaScript;

impl ScriptRunner for OsaScript {
    fn run(&self, script: &str) -> Result<String, ScriptError> {
        let output = Command::new("osascript").arg("-e").arg(script).output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(ScriptError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Escape text for use inside an AppleScript string literal
pub fn escape_applescript(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the script that opens Keynote and adds the slide
pub fn build_script(config: &SlideConfig, text: &str) -> String {
    format!(
        r#"tell application "Keynote"
    activate
    set theDocument to make new document with properties {{document theme:theme "{theme}"}}
    delay {delay}
    tell theDocument
        set theSlide to make new slide at the end of slides with properties {{base slide:master slide "{master}"}}
        tell theSlide
            set theTextItem to make new text item with properties {{object text:"{text}"}}
            set position of theTextItem to {{{x}, {y}}}
            set width of theTextItem to {width}
            set height of theTextItem to {height}
        end tell
    end tell
end tell"#,
        theme = escape_applescript(&config.theme),
        delay = config.launch_delay_secs,
        master = escape_applescript(&config.master_slide),
        text = escape_applescript(text),
        x = config.x,
        y = config.y,
        width = config.width,
        height = config.height,
    )
}

/// Tool for creating a Keynote slide
#[derive(Clone)]
pub struct KeynoteSlideTool {
    config: SlideConfig,
    runner: Arc<dyn ScriptRunner>,
}

impl KeynoteSlideTool {
    /// Create a new slide tool
    pub fn new(config: SlideConfig, runner: Arc<dyn ScriptRunner>) -> Self {
        Self { config, runner }
    }

    /// Run the automation; blocks until Keynote has finished
    pub fn create_slide(&self, text: &str) -> Result<String, ScriptError> {
        let script = build_script(&self.config, text);
        debug!(chars = text.chars().count(), "Running Keynote AppleScript");

        self.runner.run(&script).map_err(|e| {
            error!("Error creating Keynote slide: {}", e);
            e
        })?;

        Ok(format!("Created Keynote slide with provided text: {}", text))
    }

    /// Registry entry for `create_keynote_slide`
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new(
            "create_keynote_slide",
            "Create a Keynote slide with the provided text in a text box.",
            move |args| {
                let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
                Ok(self.create_slide(text)?)
            },
        )
        .param(ParamSpec::required(
            "text",
            ParamType::String,
            "The text to display in the slide",
        ))
    }
}
