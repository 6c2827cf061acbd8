//! Agent module - planning loop and conversation management
//!
//! Contains the loop that coordinates reasoning-service calls and tool execution.

pub mod action;
pub mod conversation;
pub mod loop_state;
pub mod orchestrator;
pub mod prompt;

pub use action::ActionInstruction;
pub use conversation::Conversation;
pub use loop_state::{AgentLoopState, LoopPhase, Observation};
pub use orchestrator::{Agent, SessionOutcome};
