//! Adapter between regassist types and genai types
//!
//! Conversion functions between our message/tool types and genai's, so the
//! provider can rely on genai for every wire protocol (Gemini, OpenAI, ...).

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatRole as GenaiRole,
    Tool as GenaiTool, ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::{json, Map, Value};

use crate::types::{ChatMessage, ContentPart, LlmPart, LlmResponse, MessageRole, Tool, ToolCallRequest};

use super::error::{ProviderError, ProviderResult};
use super::traits::{ChatOptions, ProviderModelConfig};

// ============================================================================
// Message Conversion: regassist -> genai
// ============================================================================

/// Convert a MessageRole to the genai ChatRole
pub fn to_genai_role(role: MessageRole) -> GenaiRole {
    match role {
        MessageRole::User => GenaiRole::User,
        MessageRole::Model => GenaiRole::Assistant,
        MessageRole::Function => GenaiRole::Tool,
    }
}

/// Convert a function call back into genai's representation
///
/// Goes through serde so that fields genai adds for some providers keep
/// their defaults.
pub fn to_genai_tool_call(call: &ToolCallRequest) -> ProviderResult<GenaiToolCall> {
    let value = json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": call.arguments,
    });
    Ok(serde_json::from_value(value)?)
}

/// Convert one message; a model turn with function calls becomes two genai
/// messages (its text, then the calls)
pub fn to_genai_message(msg: ChatMessage) -> ProviderResult<Vec<GenaiMessage>> {
    let text = msg.text();

    match msg.role {
        MessageRole::User => Ok(vec![GenaiMessage::user(text)]),
        MessageRole::Model => {
            let calls = msg
                .parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::FunctionCall { call } => Some(to_genai_tool_call(call)),
                    _ => None,
                })
                .collect::<ProviderResult<Vec<_>>>()?;

            let mut out = Vec::new();
            if !text.is_empty() || calls.is_empty() {
                out.push(GenaiMessage::assistant(text));
            }
            if !calls.is_empty() {
                out.push(GenaiMessage::from(calls));
            }
            Ok(out)
        }
        MessageRole::Function => Ok(msg
            .parts
            .into_iter()
            .filter_map(|p| match p {
                ContentPart::FunctionResponse { id, response, .. } => Some(GenaiMessage::from(
                    GenaiToolResponse::new(id, response.to_string()),
                )),
                _ => None,
            })
            .collect()),
    }
}

/// Convert a conversation to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> ProviderResult<Vec<GenaiMessage>> {
    let mut out = Vec::with_capacity(messages.len());
    for msg in messages {
        out.extend(to_genai_message(msg)?);
    }
    Ok(out)
}

// ============================================================================
// Tool Conversion: regassist -> genai
// ============================================================================

/// Convert a Tool declaration to a genai Tool
pub fn to_genai_tool(tool: Tool) -> GenaiTool {
    let mut genai_tool = GenaiTool::new(&tool.name).with_description(&tool.description);

    if let Some(schema) = tool.input_schema {
        genai_tool = genai_tool.with_schema(schema);
    }

    genai_tool
}

/// Convert tool declarations to genai tools
pub fn to_genai_tools(tools: Vec<Tool>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion: regassist -> genai
// ============================================================================

/// Convert ChatOptions to genai ChatOptions
pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    // Capture tool calls in stream so we can return them
    genai_opts.with_capture_tool_calls(true)
}

// ============================================================================
// Response Conversion: genai -> regassist
// ============================================================================

/// Convert a genai ToolCall to a ToolCallRequest
///
/// A call without a function name, or with arguments that are not a JSON
/// object, is an invalid response. Missing (`null`) arguments become `{}`.
pub fn from_genai_tool_call(provider: &str, tc: &GenaiToolCall) -> ProviderResult<ToolCallRequest> {
    if tc.fn_name.trim().is_empty() {
        return Err(ProviderError::invalid_response(
            provider,
            "function call without a name",
        ));
    }

    let arguments = match &tc.fn_arguments {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => tc.fn_arguments.clone(),
        other => {
            return Err(ProviderError::invalid_response(
                provider,
                format!("arguments of '{}' are not an object: {}", tc.fn_name, other),
            ))
        }
    };

    Ok(ToolCallRequest {
        id: tc.call_id.clone(),
        name: tc.fn_name.clone(),
        arguments,
    })
}

/// Accumulates streamed events into an [`LlmResponse`]
///
/// Consecutive text chunks form one text part; a function call closes the
/// current text part so part order follows the stream.
#[derive(Debug, Default)]
pub struct ResponseCollector {
    parts: Vec<LlmPart>,
    text: String,
}

impl ResponseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
    }

    pub fn push_function_call(&mut self, call: ToolCallRequest) {
        self.flush_text();
        self.parts.push(LlmPart::function_call(call));
    }

    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.text);
        if !text.trim().is_empty() {
            self.parts.push(LlmPart::text(text));
        }
    }

    pub fn finish(mut self) -> LlmResponse {
        self.flush_text();
        LlmResponse::new(self.parts)
    }
}

// ============================================================================
// Client Creation
// ============================================================================

/// Provider configuration for routing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "gemini", "openai", "openrouter")
    pub provider: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: impl Into<String>, model: &ProviderModelConfig) -> Self {
        Self {
            provider: provider.into(),
            api_key: model.api_key.clone(),
            api_base: model.api_base.clone(),
        }
    }
}

/// Create a genai Client with explicit auth and endpoint resolution
///
/// The key resolved at startup is the only credential used; genai's own
/// environment lookup is bypassed.
pub fn create_client(config: &ProviderConfig) -> Client {
    let explicit_api_key = config.api_key.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let explicit_key = explicit_api_key.clone();
            Box::pin(async move { Ok(explicit_key.map(AuthData::from_single)) })
        },
    );

    let target_provider = config.provider.to_lowercase();
    let target_api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let (endpoint, adapter_kind) = match target_provider.as_str() {
                "openrouter" => (
                    Endpoint::from_static("https://openrouter.ai/api/v1/"),
                    AdapterKind::OpenAI,
                ),
                "mistral" => (
                    Endpoint::from_static("https://api.mistral.ai/v1/"),
                    AdapterKind::OpenAI,
                ),
                _ => match &target_api_base {
                    Some(base) => (
                        Endpoint::from_owned(base.clone()),
                        target.model.adapter_kind,
                    ),
                    None => return Ok(target),
                },
            };

            let model = ModelIden::new(adapter_kind, target.model.model_name.clone());
            Ok(ServiceTarget {
                endpoint,
                auth: target.auth,
                model,
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

/// Check if a provider is natively supported by genai
pub fn is_genai_native(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai"
            | "anthropic"
            | "gemini"
            | "ollama"
            | "groq"
            | "xai"
            | "deepseek"
            | "cohere"
            | "fireworks"
            | "together"
    )
}

/// Check if a provider can be handled by genai (native or via OpenAI-compat)
pub fn is_genai_supported(provider: &str) -> bool {
    is_genai_native(provider)
        || matches!(provider.to_lowercase().as_str(), "openrouter" | "mistral")
}
