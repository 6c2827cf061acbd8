//! Agent loop state management
//!
//! Tracks the plan/execute state machine for one request:
//! `AwaitingPlan -> ExecutingTool -> AwaitingPlan ... -> Done | Aborted`.

use serde::{Deserialize, Serialize};

use crate::agent::conversation::Conversation;
use crate::core::ToolError;

/// Prefix of a reference to an earlier tool result, e.g. `RESULT_1`
pub const RESULT_PREFIX: &str = "RESULT_";

/// Where the loop is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    AwaitingPlan,
    ExecutingTool,
    Done,
    Aborted,
}

/// State of the agent reasoning loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    pub phase: LoopPhase,
    /// Maximum allowed planning rounds
    pub max_iterations: usize,
    pub conversation: Conversation,
    /// Outputs of successful tool calls, in order
    pub results: Vec<String>,
    /// Tool executions attempted, successful or not
    pub tool_invocations: usize,
    /// Final answer if the agent has completed reasoning
    pub final_answer: Option<String>,
}

impl AgentLoopState {
    /// Create a new loop state for a request
    pub fn new(request: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            phase: LoopPhase::AwaitingPlan,
            max_iterations,
            conversation: Conversation::new(request),
            results: Vec::new(),
            tool_invocations: 0,
            final_answer: None,
        }
    }

    /// Check if another planning round may start
    pub fn should_continue(&self) -> bool {
        self.phase == LoopPhase::AwaitingPlan
            && self.conversation.iterations() < self.max_iterations
    }

    /// Start a planning round; returns its 1-based number
    pub fn begin_round(&mut self) -> usize {
        self.conversation.start_iteration()
    }

    /// Record the raw planning reply
    pub fn record_plan(&mut self, reply: &str) {
        self.conversation.add_model(reply);
    }

    /// A tool call was decoded
    pub fn begin_tool(&mut self) {
        self.phase = LoopPhase::ExecutingTool;
    }

    /// Append the tool's observation and go back to planning
    pub fn record_observation(&mut self, observation: Observation) {
        self.conversation.add_tool(observation.to_turn_content());
        if observation.success {
            self.results.push(observation.output);
        }
        self.tool_invocations += 1;
        self.phase = LoopPhase::AwaitingPlan;
    }

    /// A final answer was decoded
    pub fn finish(&mut self, answer: impl Into<String>) {
        self.final_answer = Some(answer.into());
        self.phase = LoopPhase::Done;
    }

    /// A loop guard triggered
    pub fn abort(&mut self) {
        self.phase = LoopPhase::Aborted;
    }

    /// Replace `RESULT_<n>` values with the output of the n-th successful call
    pub fn resolve_references(
        &self,
        tool: &str,
        values: &[String],
    ) -> Result<Vec<String>, ToolError> {
        values
            .iter()
            .map(|value| {
                let Some(index) = value.strip_prefix(RESULT_PREFIX) else {
                    return Ok(value.clone());
                };
                index
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| self.results.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        ToolError::invalid(tool, format!("referenced result {} not found", value))
                    })
            })
            .collect()
    }
}

/// An observation from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Name of the tool that produced this observation
    pub tool_name: String,
    /// Whether the tool execution was successful
    pub success: bool,
    /// Output from the tool, or the error description
    pub output: String,
}

impl Observation {
    /// Create a successful observation
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: output.into(),
        }
    }

    /// Create an error observation
    pub fn error(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: error.into(),
        }
    }

    /// Text of the `tool` turn fed back to the model
    pub fn to_turn_content(&self) -> String {
        if self.success {
            format!("{} returned: {}", self.tool_name, self.output)
        } else {
            format!("{} failed: {}", self.tool_name, self.output)
        }
    }
}
