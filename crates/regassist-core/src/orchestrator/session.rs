//! Per-conversation state

use super::state::OrchestratorState;
use crate::types::{ChatMessage, ChatTurn};

/// Opening model turn of an interactive session
pub const GREETING: &str = "Hello! I'm your Registration Assistant. I can help you **register new users** (e.g., *'Register John Doe with john@example.com born 1990-01-01'*) or **fetch a list of all existing users** (*'Show me all registered users'*). What would you like to do?";

/// Ordered conversation history plus the current orchestrator state
///
/// Owned by the front-end and passed `&mut` into every orchestrator call.
#[derive(Debug, Clone, Default)]
pub struct Session {
    turns: Vec<ChatTurn>,
    state: OrchestratorState,
}

impl Session {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session opened by the assistant's greeting
    pub fn with_greeting() -> Self {
        Self {
            turns: vec![ChatTurn::model(GREETING)],
            state: OrchestratorState::Idle,
        }
    }

    /// Full history, tool turns included
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// User and model turns only
    pub fn visible_turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter().filter(|t| t.is_visible())
    }

    /// Visible history as it is sent to the LLM
    pub fn llm_history(&self) -> Vec<ChatMessage> {
        self.turns.iter().filter_map(ChatMessage::from_turn).collect()
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Set the state, returning the previous one
    pub(crate) fn set_state(&mut self, state: OrchestratorState) -> OrchestratorState {
        std::mem::replace(&mut self.state, state)
    }
}
