//! Orchestrator states

use std::fmt;

/// Where a session is within one input pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    AwaitingLlm,
    RespondingText,
    DispatchingTool,
    AwaitingFollowUp,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingLlm => "awaiting_llm",
            Self::RespondingText => "responding_text",
            Self::DispatchingTool => "dispatching_tool",
            Self::AwaitingFollowUp => "awaiting_follow_up",
        }
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
