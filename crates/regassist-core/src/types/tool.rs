//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Function declaration offered to the LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Function call requested by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned identifier, echoed in the function response
    pub id: String,
    /// Name of the function being called
    pub name: String,
    /// Arguments, normally a JSON object of strings
    pub arguments: Value,
}

impl ToolCallRequest {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get an argument as a string
    pub fn get_arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as a JSON object, suitable for a request body
    ///
    /// Anything other than an object (including `null`) becomes `{}`.
    pub fn arguments_object(&self) -> Map<String, Value> {
        match &self.arguments {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        }
    }
}

/// Outcome status of a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Why a tool call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// The LLM named a function that is not declared
    UnknownTool,
    /// The registration service could not be reached
    Connection,
    /// The service answered with an error
    Service,
    /// The service answered with something that is not a JSON object
    MalformedResponse,
}

/// Normalized result of a tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub status: ToolStatus,
    /// Response body of the service, or an error description
    pub payload: Map<String, Value>,
    /// Set for error results
    pub error_kind: Option<ToolErrorKind>,
}

impl ToolCallResult {
    /// Create a successful tool result
    pub fn success(payload: Map<String, Value>) -> Self {
        Self {
            status: ToolStatus::Success,
            payload,
            error_kind: None,
        }
    }

    /// Create an error tool result carrying a human-readable message
    pub fn error(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("status".to_string(), Value::from("error"));
        payload.insert("error".to_string(), Value::from(message.into()));
        Self {
            status: ToolStatus::Error,
            payload,
            error_kind: Some(kind),
        }
    }

    /// Create an error result from a service error body
    pub fn service_error(payload: Map<String, Value>) -> Self {
        Self {
            status: ToolStatus::Error,
            payload,
            error_kind: Some(ToolErrorKind::Service),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// Best human-readable message in the payload
    pub fn message(&self) -> Option<&str> {
        self.payload
            .get("message")
            .or_else(|| self.payload.get("error"))
            .and_then(Value::as_str)
    }

    /// The payload as a JSON value, as sent back to the LLM
    pub fn to_json(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}
