//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without network dependencies.
//! Scripted mode replays a queue of responses, which is how the orchestrator's
//! function-call paths are exercised in tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::error::{ProviderError, ProviderResult};
use super::traits::{ChatOptions, Provider, ProviderModelConfig};
use crate::logging::Logger;
use crate::types::{ChatMessage, LlmResponse, MessageRole};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(LlmResponse),
    Fail(String),
    /// Fail as if the model's answer could not be interpreted
    Malformed(String),
}

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed text response
    Fixed(String),
    /// Return the queued replies in order, then fail
    Scripted(VecDeque<MockReply>),
    /// Fail every call
    Error(String),
    /// Return a response without any part
    Empty,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    mode: Mutex<MockMode>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create with a specific mode
    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode: Mutex::new(mode),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider (echoes back user message)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider replaying the given replies in order
    pub fn scripted(replies: Vec<MockReply>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Scripted(replies.into()), logger)
    }

    /// Create an error-producing provider
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Create a provider that never says anything interpretable
    pub fn empty(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Empty, logger)
    }

    /// Conversations received so far, one entry per call
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Extract last user message content
    fn get_last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .filter(|m| m.role == MessageRole::User)
            .map(ChatMessage::text)
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        _model: &ProviderModelConfig,
        _options: &ChatOptions,
    ) -> ProviderResult<LlmResponse> {
        self.logger.debug("MockProvider: generate called");

        let reply = {
            let mut mode = self.mode.lock();
            match &mut *mode {
                MockMode::Echo => {
                    let user_msg = Self::get_last_user_message(&messages);
                    self.logger
                        .debug(&format!("MockProvider: Echo mode, echoing: {}", user_msg));
                    MockReply::Respond(LlmResponse::text(format!("Echo: {}", user_msg)))
                }
                MockMode::Fixed(response) => {
                    MockReply::Respond(LlmResponse::text(response.clone()))
                }
                MockMode::Scripted(queue) => {
                    self.logger.debug(&format!(
                        "MockProvider: Scripted mode, {} replies left",
                        queue.len()
                    ));
                    queue
                        .pop_front()
                        .unwrap_or_else(|| MockReply::Fail("script exhausted".to_string()))
                }
                MockMode::Error(message) => MockReply::Fail(message.clone()),
                MockMode::Empty => MockReply::Respond(LlmResponse::default()),
            }
        };

        self.requests.lock().push(messages);

        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(message) => Err(ProviderError::Other(format!("Mock error: {}", message))),
            MockReply::Malformed(message) => Err(ProviderError::invalid_response("mock", message)),
        }
    }
}
