//! GenaiProvider - Unified provider using the genai crate
//!
//! Handles every genai-supported provider (Gemini, OpenAI, Anthropic, ...) as
//! well as OpenAI-compatible ones routed through the ServiceTargetResolver.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

use genai::chat::{ChatRequest, ChatStreamEvent};

use crate::logging::Logger;
use crate::types::{ChatMessage, LlmResponse};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_tool_call, is_genai_supported, to_genai_messages, to_genai_options,
    to_genai_tools, ProviderConfig, ResponseCollector,
};
use super::traits::{ChatOptions, Provider, ProviderModelConfig};

/// Unified provider using genai for all supported LLM APIs
pub struct GenaiProvider {
    /// Provider identifier
    provider_id: String,
    /// Logger for debug output
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    /// Create a new GenaiProvider
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }

    /// Check if this provider can handle the given provider ID
    pub fn supports(provider_id: &str) -> bool {
        is_genai_supported(provider_id)
    }

    /// Extract model name from a model string (e.g., "gemini/gemini-1.5-flash" -> "gemini-1.5-flash")
    pub fn extract_model_name(model: &str) -> &str {
        model.split('/').nth(1).unwrap_or(model)
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    fn requires_api_key(&self) -> bool {
        !matches!(self.provider_id.as_str(), "ollama")
    }

    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        model_config: &ProviderModelConfig,
        options: &ChatOptions,
    ) -> ProviderResult<LlmResponse> {
        self.logger.info(&format!(
            "[GenaiProvider] generate called: provider={}, model={}, messages={}",
            self.provider_id,
            model_config.model,
            messages.len()
        ));

        if self.requires_api_key() && model_config.api_key.is_none() {
            return Err(ProviderError::missing_api_key(&self.provider_id));
        }

        let client = create_client(&ProviderConfig::new(&self.provider_id, model_config));

        let mut chat_req = ChatRequest::new(to_genai_messages(messages)?);
        if !options.tools.is_empty() {
            chat_req = chat_req.with_tools(to_genai_tools(options.tools.clone()));
        }

        let genai_options = to_genai_options(options);
        let model_name = Self::extract_model_name(&model_config.model);

        let chat_stream = client
            .exec_chat_stream(model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| ProviderError::api_error(&self.provider_id, 500, e.to_string()))?;

        let mut stream = Box::pin(chat_stream.stream);
        let mut collector = ResponseCollector::new();

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) => {
                    self.logger.debug(&format!(
                        "[GenaiProvider] Stream event: Chunk ({} chars)",
                        chunk.content.len()
                    ));
                    collector.push_text(&chunk.content);
                }
                Ok(ChatStreamEvent::End(end)) => {
                    self.logger.debug("[GenaiProvider] Stream event: End");
                    if let Some(tool_calls) = end.captured_tool_calls() {
                        for tc in tool_calls.iter() {
                            let call = from_genai_tool_call(&self.provider_id, tc).map_err(|e| {
                                self.logger.warn(&format!("[GenaiProvider] {}", e));
                                e
                            })?;
                            collector.push_function_call(call);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    self.logger
                        .error(&format!("[GenaiProvider] Stream error: {}", e));
                    return Err(ProviderError::api_error(&self.provider_id, 500, e.to_string()));
                }
            }
        }

        let response = collector.finish();
        self.logger.info(&format!(
            "[GenaiProvider] Response complete: {} parts",
            response.parts.len()
        ));
        Ok(response)
    }
}
