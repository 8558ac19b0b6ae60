//! Errors surfaced by a conversation pass
//!
//! None of these abort the session. They are collected into the
//! [`TurnOutcome`](super::TurnOutcome) so callers can inspect what went wrong
//! while the user sees a fixed-text reply.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("LLM communication error: {0}")]
    LlmCommunication(String),

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("Unrecognized tool: {0}")]
    UnrecognizedTool(String),

    #[error("Registration server unreachable: {0}")]
    Connection(String),

    #[error("Tool {tool} failed: {message}")]
    ToolFailed { tool: String, message: String },
}
