//! Dispatch of LLM function calls to the registration service

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::logging::Logger;
use crate::types::{ToolCallRequest, ToolCallResult, ToolErrorKind};

use super::catalog::SupportedTool;

/// Runs one function call and normalizes its outcome
///
/// Implementations never fail: every problem is reported as an error
/// [`ToolCallResult`].
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    async fn invoke(&self, call: &ToolCallRequest) -> ToolCallResult;
}

/// Dispatcher that POSTs to the registration service
pub struct HttpToolDispatcher {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<dyn Logger>,
}

impl HttpToolDispatcher {
    /// Create a dispatcher for the service at `base_url`
    pub fn new(base_url: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, logger)
    }

    /// Create a dispatcher with a preconfigured HTTP client
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            logger,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL for a tool
    pub fn endpoint(&self, tool: SupportedTool) -> String {
        format!("{}/{}", self.base_url, tool.name())
    }

    fn request_body(tool: SupportedTool, call: &ToolCallRequest) -> Value {
        match tool {
            SupportedTool::StoreUserData => Value::Object(call.arguments_object()),
            SupportedTool::FetchAllUsers => Value::Object(Map::new()),
        }
    }

    async fn post(&self, tool: SupportedTool, body: Value) -> ToolCallResult {
        let url = self.endpoint(tool);
        self.logger
            .info(&format!("[ToolDispatcher] Calling {} with args: {}", url, body));

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger
                    .error(&format!("[ToolDispatcher] Could not reach {}: {}", url, e));
                return ToolCallResult::error(
                    ToolErrorKind::Connection,
                    format!("Server connection error: {}", e),
                );
            }
        };

        let status = response.status();
        self.logger
            .debug(&format!("[ToolDispatcher] Response status: {}", status));

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                self.logger.warn(&format!(
                    "[ToolDispatcher] Non-JSON response from {}: {}",
                    url, e
                ));
                return ToolCallResult::error(
                    ToolErrorKind::MalformedResponse,
                    format!(
                        "Malformed response from registration service (HTTP {}): {}",
                        status.as_u16(),
                        e
                    ),
                );
            }
        };

        match body {
            Value::Object(payload) => {
                let succeeded = status.is_success()
                    && payload.get("status").and_then(Value::as_str) == Some("success");
                if succeeded {
                    ToolCallResult::success(payload)
                } else {
                    self.logger.warn(&format!(
                        "[ToolDispatcher] {} failed (HTTP {})",
                        tool,
                        status.as_u16()
                    ));
                    ToolCallResult::service_error(payload)
                }
            }
            other => ToolCallResult::error(
                ToolErrorKind::MalformedResponse,
                format!(
                    "Malformed response from registration service (HTTP {}): {}",
                    status.as_u16(),
                    other
                ),
            ),
        }
    }
}

#[async_trait]
impl ToolDispatcher for HttpToolDispatcher {
    async fn invoke(&self, call: &ToolCallRequest) -> ToolCallResult {
        match SupportedTool::from_name(&call.name) {
            Some(tool) => {
                let body = Self::request_body(tool, call);
                self.post(tool, body).await
            }
            None => {
                self.logger.warn(&format!(
                    "[ToolDispatcher] Refusing unknown tool: {}",
                    call.name
                ));
                ToolCallResult::error(
                    ToolErrorKind::UnknownTool,
                    format!("Unknown tool: {}", call.name),
                )
            }
        }
    }
}

impl std::fmt::Debug for HttpToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpToolDispatcher")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use serde_json::json;

    fn dispatcher(base_url: &str) -> HttpToolDispatcher {
        HttpToolDispatcher::new(base_url, Arc::new(NoOpLogger::new()))
    }

    /// An address nothing listens on
    async fn closed_address() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_endpoint_paths() {
        let d = dispatcher("http://127.0.0.1:5000/");
        assert_eq!(d.base_url(), "http://127.0.0.1:5000");
        assert_eq!(
            d.endpoint(SupportedTool::StoreUserData),
            "http://127.0.0.1:5000/store_user_data"
        );
        assert_eq!(
            d.endpoint(SupportedTool::FetchAllUsers),
            "http://127.0.0.1:5000/fetch_all_users"
        );
    }

    #[test]
    fn test_request_bodies() {
        let store = ToolCallRequest::new(
            "1",
            "store_user_data",
            json!({"name": "A", "email": "a@example.com", "dob": "2000-01-01"}),
        );
        assert_eq!(
            HttpToolDispatcher::request_body(SupportedTool::StoreUserData, &store),
            json!({"name": "A", "email": "a@example.com", "dob": "2000-01-01"})
        );

        let fetch = ToolCallRequest::new("2", "fetch_all_users", json!({"ignored": true}));
        assert_eq!(
            HttpToolDispatcher::request_body(SupportedTool::FetchAllUsers, &fetch),
            json!({})
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_dispatched() {
        // A live address would turn a dispatch into a Connection error instead
        let d = dispatcher(&closed_address().await);
        let call = ToolCallRequest::new("1", "delete_user", json!({"name": "A"}));

        let result = d.invoke(&call).await;

        assert!(!result.is_success());
        assert_eq!(result.error_kind, Some(ToolErrorKind::UnknownTool));
        assert_eq!(result.message(), Some("Unknown tool: delete_user"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error_result() {
        let d = dispatcher(&closed_address().await);
        let call = ToolCallRequest::new("1", "fetch_all_users", json!({}));

        let result = d.invoke(&call).await;

        assert!(!result.is_success());
        assert_eq!(result.error_kind, Some(ToolErrorKind::Connection));
        assert!(result.message().unwrap().starts_with("Server connection error"));
    }
}
