//! Conversation history management
//!
//! History for a single request. Append-only: turns are never removed or
//! rewritten while the session runs.

use crate::core::{Role, Turn};

/// Turns exchanged during one request, plus the planning round count
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// Message history
    turns: Vec<Turn>,
    /// Planning rounds started so far
    iterations: usize,
}

impl Conversation {
    /// Start a conversation from the user's request
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(request)],
            iterations: 0,
        }
    }

    /// Add a model turn (the raw planning reply)
    pub fn add_model(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::model(content));
    }

    /// Add a tool observation turn
    pub fn add_tool(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::tool(content));
    }

    /// Count a new planning round and return its 1-based number
    pub fn start_iteration(&mut self) -> usize {
        self.iterations += 1;
        self.iterations
    }

    /// Planning rounds started so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns with the given role
    pub fn turns_with_role(&self, role: Role) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.role == role)
    }

    /// Get turn count
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
