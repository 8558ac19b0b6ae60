//! Parsed LLM responses

use serde::{Deserialize, Serialize};

use super::tool::ToolCallRequest;

/// One interpretable part of an LLM response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        call: ToolCallRequest,
    },
}

impl LlmPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        LlmPart::Text { text: text.into() }
    }

    /// Create a function call part
    pub fn function_call(call: ToolCallRequest) -> Self {
        LlmPart::FunctionCall { call }
    }

    /// Get the text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LlmPart::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Get the call if this is a function call part
    pub fn as_function_call(&self) -> Option<&ToolCallRequest> {
        match self {
            LlmPart::FunctionCall { call } => Some(call),
            _ => None,
        }
    }
}

/// A complete LLM turn, parts in the order the provider produced them
///
/// Providers drop anything they cannot map to an [`LlmPart`], so an empty
/// response means the model said nothing interpretable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub parts: Vec<LlmPart>,
}

impl LlmResponse {
    pub fn new(parts: Vec<LlmPart>) -> Self {
        Self { parts }
    }

    /// A response made of a single text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![LlmPart::text(text)])
    }

    /// A response made of a single function call
    pub fn function_call(call: ToolCallRequest) -> Self {
        Self::new(vec![LlmPart::function_call(call)])
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Function calls in the response
    pub fn function_calls(&self) -> impl Iterator<Item = &ToolCallRequest> {
        self.parts.iter().filter_map(LlmPart::as_function_call)
    }
}
