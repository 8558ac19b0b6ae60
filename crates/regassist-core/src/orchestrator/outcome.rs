//! Result of one conversation pass

use super::error::AssistantError;
use crate::types::{ChatTurn, UserRecord};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message for the user; never part of the conversation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Everything one call to `Orchestrator::handle_input` produced
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// New visible model turns, in order
    pub turns: Vec<ChatTurn>,
    pub notices: Vec<Notice>,
    pub errors: Vec<AssistantError>,
    /// Users returned by `fetch_all_users` during this pass, for display
    pub users: Vec<UserRecord>,
    /// Number of tool dispatches performed
    pub dispatches: usize,
}

impl TurnOutcome {
    pub(crate) fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice::new(level, text));
    }

    /// Concatenated text of the new model turns
    pub fn reply_text(&self) -> String {
        self.turns
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
