//! Core types for the registration assistant
//!
//! This module contains the shared types used by the store, the registration
//! service, the tool dispatcher, the providers and the orchestrator.

mod message;
mod record;
mod response;
mod tool;
mod turn;

pub use message::{ChatMessage, ContentPart, MessageRole};
pub use record::UserRecord;
pub use response::{LlmPart, LlmResponse};
pub use tool::{Tool, ToolCallRequest, ToolCallResult, ToolErrorKind, ToolStatus};
pub use turn::{ChatTurn, TurnRole};
