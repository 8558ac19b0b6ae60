//! Messages exchanged with the LLM capability

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool::ToolCallRequest;
use super::turn::{ChatTurn, TurnRole};

/// Message role at the LLM boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
    /// Structured function responses sent back after a dispatch
    Function,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Model => write!(f, "model"),
            MessageRole::Function => write!(f, "function"),
        }
    }
}

/// A message for LLM requests: a role and an ordered list of parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub parts: Vec<ContentPart>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_parts(MessageRole::User, vec![ContentPart::text(text)])
    }

    /// Create a model message
    pub fn model(text: impl Into<String>) -> Self {
        Self::with_parts(MessageRole::Model, vec![ContentPart::text(text)])
    }

    /// Create a function response message for a dispatched call
    pub fn function_response(call: &ToolCallRequest, response: Value) -> Self {
        Self::with_parts(
            MessageRole::Function,
            vec![ContentPart::FunctionResponse {
                id: call.id.clone(),
                name: call.name.clone(),
                response,
            }],
        )
    }

    /// Create a message with structured content parts
    pub fn with_parts(role: MessageRole, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Convert a visible chat turn into an LLM message
    ///
    /// Tool turns are never part of the visible history and yield `None`.
    pub fn from_turn(turn: &ChatTurn) -> Option<Self> {
        match turn.role {
            TurnRole::User => Some(Self::user(turn.text.clone())),
            TurnRole::Model => Some(Self::model(turn.text.clone())),
            TurnRole::Tool => None,
        }
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content part of an LLM message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// The model asking for a function to be run
    FunctionCall {
        call: ToolCallRequest,
    },
    /// The result of a function call, returned to the model
    FunctionResponse {
        id: String,
        name: String,
        response: Value,
    },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create a function call content part
    pub fn function_call(call: ToolCallRequest) -> Self {
        ContentPart::FunctionCall { call }
    }
}
