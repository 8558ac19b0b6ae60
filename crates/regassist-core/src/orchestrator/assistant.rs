//! The conversation orchestrator

use std::sync::Arc;

use serde_json::Value;

use super::error::AssistantError;
use super::outcome::{NoticeLevel, TurnOutcome};
use super::session::Session;
use super::state::OrchestratorState;
use crate::logging::Logger;
use crate::providers::{ChatOptions, Provider, ProviderError, ProviderModelConfig};
use crate::tools::{declared_tools, title_case, SupportedTool, ToolDispatcher};
use crate::types::{
    ChatMessage, ChatTurn, ContentPart, LlmPart, LlmResponse, MessageRole, ToolCallRequest,
    ToolCallResult, ToolErrorKind, UserRecord,
};

const LLM_FAILURE_REPLY: &str =
    "I encountered an error communicating with the language model. Please try again later.";
const NOT_UNDERSTOOD_REPLY: &str =
    "I'm having trouble understanding that. Please rephrase your request.";
const EMPTY_FOLLOW_UP_REPLY: &str =
    "The AI provided an empty or malformed follow-up. Please try again.";
const CHAINED_CALL_NOTICE: &str = "Assistant wants to perform another action. Chained tool calls are not supported; please make a new request.";
const NO_USERS: &str = "No users registered yet.";

/// Drives one user input through the LLM, the tool dispatcher and back
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use regassist_core::logging::NoOpLogger;
/// use regassist_core::orchestrator::{Orchestrator, Session};
/// use regassist_core::providers::{create_provider, ProviderModelConfig};
/// use regassist_core::tools::HttpToolDispatcher;
///
/// # async fn run() {
/// let logger = Arc::new(NoOpLogger::new());
/// let orchestrator = Orchestrator::new(
///     create_provider("mock", logger.clone()),
///     Arc::new(HttpToolDispatcher::new("http://127.0.0.1:5000", logger.clone())),
///     ProviderModelConfig::new("mock-model"),
///     logger,
/// );
///
/// let mut session = Session::with_greeting();
/// let outcome = orchestrator.handle_input(&mut session, "Show me all registered users").await;
/// println!("{}", outcome.reply_text());
/// # }
/// ```
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    dispatcher: Arc<dyn ToolDispatcher>,
    model: ProviderModelConfig,
    options: ChatOptions,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    /// Create an orchestrator offering the registration tools to the LLM
    pub fn new(
        provider: Arc<dyn Provider>,
        dispatcher: Arc<dyn ToolDispatcher>,
        model: ProviderModelConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            model,
            options: ChatOptions::new().with_tools(declared_tools()),
            logger,
        }
    }

    /// Set the sampling temperature for every request
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options = self.options.with_temperature(temperature);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Process one user input
    ///
    /// Appends the user turn, asks the LLM, dispatches every function call
    /// of the response with one follow-up each, and leaves the session idle.
    /// Failures never escape: they become fixed-text model turns and are
    /// recorded in the outcome.
    pub async fn handle_input(&self, session: &mut Session, input: &str) -> TurnOutcome {
        let mut outcome = TurnOutcome::default();

        session.push(ChatTurn::user(input));
        self.transition(session, OrchestratorState::AwaitingLlm);
        let request = session.llm_history();

        let response = match self
            .provider
            .generate(request.clone(), &self.model, &self.options)
            .await
        {
            Ok(response) => response,
            Err(e @ ProviderError::InvalidResponse { .. }) => {
                self.logger.warn(&format!("LLM response rejected: {}", e));
                outcome.errors.push(AssistantError::MalformedResponse(e.to_string()));
                self.respond(session, &mut outcome, NOT_UNDERSTOOD_REPLY);
                self.transition(session, OrchestratorState::Idle);
                return outcome;
            }
            Err(e) => {
                self.logger.error(&format!("LLM request failed: {}", e));
                outcome.errors.push(AssistantError::LlmCommunication(e.to_string()));
                self.respond(session, &mut outcome, LLM_FAILURE_REPLY);
                self.transition(session, OrchestratorState::Idle);
                return outcome;
            }
        };

        let mut responded = false;
        for part in &response.parts {
            match part {
                LlmPart::Text { text } if !text.trim().is_empty() => {
                    self.transition(session, OrchestratorState::RespondingText);
                    self.respond(session, &mut outcome, text.clone());
                    responded = true;
                }
                LlmPart::Text { .. } => {}
                LlmPart::FunctionCall { call } => {
                    self.run_tool_call(session, &mut outcome, &request, &response, call)
                        .await;
                    responded = true;
                }
            }
        }

        if !responded {
            self.logger.warn("LLM response had no text or function call");
            outcome.errors.push(AssistantError::MalformedResponse(
                "response contained no text or function call".to_string(),
            ));
            self.respond(session, &mut outcome, NOT_UNDERSTOOD_REPLY);
        }

        self.transition(session, OrchestratorState::Idle);
        outcome
    }

    async fn run_tool_call(
        &self,
        session: &mut Session,
        outcome: &mut TurnOutcome,
        request: &[ChatMessage],
        response: &LlmResponse,
        call: &ToolCallRequest,
    ) {
        self.transition(session, OrchestratorState::DispatchingTool);
        outcome.notify(
            NoticeLevel::Info,
            format!("Assistant is taking action: {}...", title_case(&call.name)),
        );

        // Unknown names are dispatched too, so the error result reaches the LLM
        let result = self.dispatcher.invoke(call).await;
        outcome.dispatches += 1;

        if result.error_kind == Some(ToolErrorKind::Connection) {
            let details = result.message().unwrap_or("Unknown error.").to_string();
            outcome.notify(
                NoticeLevel::Error,
                format!(
                    "Connection Error: Could not reach the Registration Server. Details: {}",
                    details
                ),
            );
            outcome.errors.push(AssistantError::Connection(details));
        } else {
            match SupportedTool::from_name(&call.name) {
                Some(SupportedTool::StoreUserData) => Self::report_store(call, &result, outcome),
                Some(SupportedTool::FetchAllUsers) => {
                    self.report_fetch(&result, session, outcome)
                }
                None => {
                    self.logger
                        .warn(&format!("LLM requested unknown tool '{}'", call.name));
                    outcome.notify(
                        NoticeLevel::Error,
                        format!("Assistant tried to call an unknown tool: {}.", call.name),
                    );
                    outcome
                        .errors
                        .push(AssistantError::UnrecognizedTool(call.name.clone()));
                }
            }
        }

        let payload = result.to_json();
        session.push(ChatTurn::tool(payload.to_string()));

        self.transition(session, OrchestratorState::AwaitingFollowUp);
        let follow_up = follow_up_messages(request, response, call, payload);
        match self
            .provider
            .generate(follow_up, &self.model, &self.options)
            .await
        {
            Ok(reply) => self.handle_follow_up(session, outcome, reply),
            Err(e @ ProviderError::InvalidResponse { .. }) => {
                self.logger.warn(&format!("Follow-up rejected: {}", e));
                outcome.errors.push(AssistantError::MalformedResponse(e.to_string()));
                self.respond(session, outcome, EMPTY_FOLLOW_UP_REPLY);
            }
            Err(e) => {
                self.logger.error(&format!("Follow-up request failed: {}", e));
                outcome.errors.push(AssistantError::LlmCommunication(e.to_string()));
                self.respond(
                    session,
                    outcome,
                    format!("An unexpected error occurred during follow-up: {}", e),
                );
            }
        }
    }

    fn report_store(call: &ToolCallRequest, result: &ToolCallResult, outcome: &mut TurnOutcome) {
        if result.is_success() {
            let name = call.get_arg_str("name").unwrap_or("N/A");
            outcome.notify(
                NoticeLevel::Success,
                format!("Success! User '{}' has been registered.", name),
            );
        } else {
            let message = result.message().unwrap_or("Unknown error.").to_string();
            outcome.notify(
                NoticeLevel::Error,
                format!("Registration Failed: {}", message),
            );
            outcome.errors.push(AssistantError::ToolFailed {
                tool: call.name.clone(),
                message,
            });
        }
    }

    fn report_fetch(&self, result: &ToolCallResult, session: &mut Session, outcome: &mut TurnOutcome) {
        if !result.is_success() {
            let message = result.message().unwrap_or("Unknown error.").to_string();
            outcome.notify(
                NoticeLevel::Error,
                format!("Failed to fetch users: {}", message),
            );
            outcome.errors.push(AssistantError::ToolFailed {
                tool: SupportedTool::FetchAllUsers.name().to_string(),
                message,
            });
            return;
        }

        let users = result
            .payload
            .get("users")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if users.is_empty() {
            outcome.notify(NoticeLevel::Info, NO_USERS);
            self.respond(session, outcome, NO_USERS);
            return;
        }

        outcome.notify(NoticeLevel::Success, "Here are the registered users:");
        outcome.users = users
            .iter()
            .filter_map(|u| serde_json::from_value::<UserRecord>(u.clone()).ok())
            .collect();
        let field = |user: &Value, key: &str| {
            user.get(key)
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string()
        };
        let lines: Vec<String> = users
            .iter()
            .map(|u| format!("- {} ({})", field(u, "Name"), field(u, "email")))
            .collect();
        self.respond(
            session,
            outcome,
            format!("Found {} registered users:\n{}", users.len(), lines.join("\n")),
        );
    }

    fn handle_follow_up(&self, session: &mut Session, outcome: &mut TurnOutcome, reply: LlmResponse) {
        let mut responded = false;
        for part in reply.parts {
            match part {
                LlmPart::Text { text } if !text.trim().is_empty() => {
                    self.respond(session, outcome, text);
                    responded = true;
                }
                LlmPart::Text { .. } => {}
                LlmPart::FunctionCall { call } => {
                    self.logger.info(&format!(
                        "Not dispatching chained call to '{}'",
                        call.name
                    ));
                    outcome.notify(NoticeLevel::Warning, CHAINED_CALL_NOTICE);
                    responded = true;
                }
            }
        }

        if !responded {
            self.logger.warn("Follow-up response had no text or function call");
            outcome.errors.push(AssistantError::MalformedResponse(
                "follow-up contained no text or function call".to_string(),
            ));
            self.respond(session, outcome, EMPTY_FOLLOW_UP_REPLY);
        }
    }

    fn respond(&self, session: &mut Session, outcome: &mut TurnOutcome, text: impl Into<String>) {
        let turn = ChatTurn::model(text);
        session.push(turn.clone());
        outcome.turns.push(turn);
    }

    fn transition(&self, session: &mut Session, to: OrchestratorState) {
        let from = session.set_state(to);
        if from != to {
            self.logger.debug(&format!("Orchestrator: {} -> {}", from, to));
        }
    }
}

/// Messages for the follow-up after dispatching `call`
///
/// The initial request, the model's turn carrying its text and this call,
/// then the structured function response.
fn follow_up_messages(
    request: &[ChatMessage],
    response: &LlmResponse,
    call: &ToolCallRequest,
    payload: Value,
) -> Vec<ChatMessage> {
    let model_parts = response
        .parts
        .iter()
        .filter_map(|part| match part {
            LlmPart::Text { text } if !text.trim().is_empty() => Some(ContentPart::text(text.clone())),
            LlmPart::FunctionCall { call: c } if std::ptr::eq(c, call) => {
                Some(ContentPart::function_call(c.clone()))
            }
            _ => None,
        })
        .collect();

    let mut messages = request.to_vec();
    messages.push(ChatMessage::with_parts(MessageRole::Model, model_parts));
    messages.push(ChatMessage::function_response(call, payload));
    messages
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("model", &self.model.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::{MockProvider, MockReply};
    use crate::types::TurnRole;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Map};
    use std::collections::VecDeque;

    /// Dispatcher answering from a queue, success by default
    #[derive(Default)]
    struct StubDispatcher {
        results: Mutex<VecDeque<ToolCallResult>>,
        calls: Mutex<Vec<ToolCallRequest>>,
    }

    impl StubDispatcher {
        fn with_results(results: Vec<ToolCallResult>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl ToolDispatcher for StubDispatcher {
        async fn invoke(&self, call: &ToolCallRequest) -> ToolCallResult {
            self.calls.lock().push(call.clone());
            self.results
                .lock()
                .pop_front()
                .unwrap_or_else(|| success(json!({"status": "success", "message": "ok"})))
        }
    }

    fn success(body: Value) -> ToolCallResult {
        match body {
            Value::Object(map) => ToolCallResult::success(map),
            _ => ToolCallResult::success(Map::new()),
        }
    }

    fn store_call(name: &str) -> ToolCallRequest {
        ToolCallRequest::new(
            "call_1",
            "store_user_data",
            json!({"name": name, "email": "john@example.com", "dob": "1990-01-01"}),
        )
    }

    fn fetch_call() -> ToolCallRequest {
        ToolCallRequest::new("call_2", "fetch_all_users", json!({}))
    }

    fn reply(response: LlmResponse) -> MockReply {
        MockReply::Respond(response)
    }

    fn setup(
        replies: Vec<MockReply>,
        dispatcher: StubDispatcher,
    ) -> (Orchestrator, Arc<MockProvider>, Arc<StubDispatcher>) {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger::new());
        let provider = Arc::new(MockProvider::scripted(replies, logger.clone()));
        let dispatcher = Arc::new(dispatcher);
        let orchestrator = Orchestrator::new(
            provider.clone(),
            dispatcher.clone(),
            ProviderModelConfig::new("mock-model"),
            logger,
        );
        (orchestrator, provider, dispatcher)
    }

    #[tokio::test]
    async fn test_text_response() {
        let (orchestrator, provider, dispatcher) = setup(
            vec![reply(LlmResponse::text("Hi! How can I help?"))],
            StubDispatcher::default(),
        );
        let mut session = Session::with_greeting();

        let outcome = orchestrator.handle_input(&mut session, "hello").await;

        assert_eq!(outcome.reply_text(), "Hi! How can I help?");
        assert_eq!(outcome.dispatches, 0);
        assert!(!outcome.has_errors());
        assert_eq!(dispatcher.call_count(), 0);
        assert_eq!(session.len(), 3);
        assert_eq!(session.state(), OrchestratorState::Idle);

        // Greeting and the new input, with the declared tools
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].len(), 2);
        assert_eq!(requests[0][1].text(), "hello");
    }

    #[tokio::test]
    async fn test_store_user_success() {
        let (orchestrator, provider, dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call("John Doe"))),
                reply(LlmResponse::text("John Doe is now registered.")),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator
            .handle_input(&mut session, "Register John Doe with john@example.com born 1990-01-01")
            .await;

        assert_eq!(outcome.dispatches, 1);
        assert_eq!(dispatcher.call_count(), 1);
        assert_eq!(outcome.reply_text(), "John Doe is now registered.");
        assert_eq!(
            outcome.notices.iter().map(|n| n.text.as_str()).collect::<Vec<_>>(),
            vec![
                "Assistant is taking action: Store User Data...",
                "Success! User 'John Doe' has been registered.",
            ]
        );

        let tool_turns: Vec<_> = session
            .turns()
            .iter()
            .filter(|t| t.role == TurnRole::Tool)
            .collect();
        assert_eq!(tool_turns.len(), 1);
        let payload: Value = serde_json::from_str(&tool_turns[0].text).unwrap();
        assert_eq!(payload["status"], "success");

        // Follow-up carries the call and its structured response
        let follow_up = &provider.requests()[1];
        let last = follow_up.last().unwrap();
        assert_eq!(last.role, MessageRole::Function);
        match &last.parts[0] {
            ContentPart::FunctionResponse { id, name, response } => {
                assert_eq!(id, "call_1");
                assert_eq!(name, "store_user_data");
                assert_eq!(response["status"], "success");
            }
            other => panic!("unexpected part {other:?}"),
        }
        let model = &follow_up[follow_up.len() - 2];
        assert!(matches!(model.parts[0], ContentPart::FunctionCall { .. }));
    }

    #[tokio::test]
    async fn test_chained_call_is_not_dispatched() {
        let (orchestrator, _provider, dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call("John Doe"))),
                reply(LlmResponse::function_call(fetch_call())),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "register john").await;

        assert_eq!(outcome.dispatches, 1);
        assert_eq!(dispatcher.call_count(), 1);
        assert!(outcome.turns.is_empty());
        let last = outcome.notices.last().unwrap();
        assert_eq!(last.level, NoticeLevel::Warning);
        assert!(last.text.contains("Chained tool calls are not supported"));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let (orchestrator, _provider, dispatcher) =
            setup(vec![reply(LlmResponse::default())], StubDispatcher::default());
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "???").await;

        assert_eq!(outcome.reply_text(), NOT_UNDERSTOOD_REPLY);
        assert!(matches!(outcome.errors[0], AssistantError::MalformedResponse(_)));
        assert_eq!(dispatcher.call_count(), 0);
        assert_eq!(session.state(), OrchestratorState::Idle);
    }

    #[tokio::test]
    async fn test_llm_failure() {
        let (orchestrator, provider, _dispatcher) = setup(
            vec![MockReply::Fail("quota exceeded".to_string())],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "hello").await;

        assert_eq!(outcome.reply_text(), LLM_FAILURE_REPLY);
        assert!(matches!(outcome.errors[0], AssistantError::LlmCommunication(_)));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(session.turns().last().unwrap().text, LLM_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_uninterpretable_response() {
        let (orchestrator, _provider, dispatcher) = setup(
            vec![MockReply::Malformed("function call without a name".to_string())],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "hello").await;

        assert_eq!(outcome.reply_text(), NOT_UNDERSTOOD_REPLY);
        assert!(matches!(outcome.errors[0], AssistantError::MalformedResponse(_)));
        assert_eq!(dispatcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_uninterpretable_follow_up() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call("John Doe"))),
                MockReply::Malformed("arguments are not an object".to_string()),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "register john").await;

        assert_eq!(outcome.reply_text(), EMPTY_FOLLOW_UP_REPLY);
        assert!(matches!(outcome.errors[0], AssistantError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_dispatched() {
        let call = ToolCallRequest::new("call_9", "delete_user", json!({"name": "x"}));
        let (orchestrator, provider, dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(call)),
                reply(LlmResponse::text("Sorry, I can't do that.")),
            ],
            StubDispatcher::with_results(vec![ToolCallResult::error(
                ToolErrorKind::UnknownTool,
                "Unknown tool: delete_user",
            )]),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "delete x").await;

        assert_eq!(dispatcher.call_count(), 1);
        assert_eq!(
            outcome.errors,
            vec![AssistantError::UnrecognizedTool("delete_user".to_string())]
        );
        assert!(outcome
            .notices
            .iter()
            .any(|n| n.text == "Assistant tried to call an unknown tool: delete_user."));
        assert_eq!(outcome.reply_text(), "Sorry, I can't do that.");

        let follow_up = &provider.requests()[1];
        match &follow_up.last().unwrap().parts[0] {
            ContentPart::FunctionResponse { response, .. } => {
                assert_eq!(response["error"], "Unknown tool: delete_user");
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_with_no_users() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(fetch_call())),
                reply(LlmResponse::text("There are no registered users.")),
            ],
            StubDispatcher::with_results(vec![success(json!({"status": "success", "users": []}))]),
        );
        let mut session = Session::new();

        let outcome = orchestrator
            .handle_input(&mut session, "Show me all registered users")
            .await;

        assert_eq!(outcome.turns[0].text, "No users registered yet.");
        assert_eq!(outcome.turns[1].text, "There are no registered users.");
        assert!(outcome
            .notices
            .iter()
            .any(|n| n.level == NoticeLevel::Info && n.text == "No users registered yet."));
    }

    #[tokio::test]
    async fn test_fetch_summary_lists_users() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(fetch_call())),
                reply(LlmResponse::text("Two users.")),
            ],
            StubDispatcher::with_results(vec![success(json!({
                "status": "success",
                "users": [
                    {"Name": "John Doe", "email": "john@example.com", "dob": "1990-01-01"},
                    {"Name": "Jane Roe", "email": "jane@example.com", "dob": "1985-05-05"}
                ]
            }))]),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "list users").await;

        assert_eq!(
            outcome.turns[0].text,
            "Found 2 registered users:\n- John Doe (john@example.com)\n- Jane Roe (jane@example.com)"
        );
        assert_eq!(
            outcome.users,
            vec![
                UserRecord::new("John Doe", "john@example.com", "1990-01-01"),
                UserRecord::new("Jane Roe", "jane@example.com", "1985-05-05"),
            ]
        );
    }

    #[tokio::test]
    async fn test_registration_failure_notice() {
        let mut body = Map::new();
        body.insert("status".into(), json!("error"));
        body.insert("message".into(), json!("Missing name, email, or dob"));
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call(""))),
                reply(LlmResponse::text("I need a name.")),
            ],
            StubDispatcher::with_results(vec![ToolCallResult::service_error(body)]),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "register").await;

        assert!(outcome
            .notices
            .iter()
            .any(|n| n.text == "Registration Failed: Missing name, email, or dob"));
        assert!(matches!(outcome.errors[0], AssistantError::ToolFailed { .. }));
    }

    #[tokio::test]
    async fn test_connection_error() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(fetch_call())),
                reply(LlmResponse::text("The server seems down.")),
            ],
            StubDispatcher::with_results(vec![ToolCallResult::error(
                ToolErrorKind::Connection,
                "Server connection error: refused",
            )]),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "list users").await;

        assert_eq!(
            outcome.errors,
            vec![AssistantError::Connection("Server connection error: refused".to_string())]
        );
        assert!(outcome.notices.iter().any(|n| n.text
            == "Connection Error: Could not reach the Registration Server. Details: Server connection error: refused"));
        assert_eq!(outcome.reply_text(), "The server seems down.");
    }

    #[tokio::test]
    async fn test_follow_up_failure() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call("John Doe"))),
                MockReply::Fail("timeout".to_string()),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "register john").await;

        assert_eq!(outcome.turns.len(), 1);
        assert!(outcome.turns[0]
            .text
            .starts_with("An unexpected error occurred during follow-up: "));
        assert!(outcome.turns[0].text.contains("timeout"));
    }

    #[tokio::test]
    async fn test_empty_follow_up() {
        let (orchestrator, _provider, _dispatcher) = setup(
            vec![
                reply(LlmResponse::function_call(store_call("John Doe"))),
                reply(LlmResponse::default()),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "register john").await;

        assert_eq!(outcome.reply_text(), EMPTY_FOLLOW_UP_REPLY);
        assert!(matches!(outcome.errors[0], AssistantError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_each_initial_call_gets_one_follow_up() {
        let response = LlmResponse::new(vec![
            LlmPart::text("On it."),
            LlmPart::function_call(store_call("John Doe")),
            LlmPart::function_call(fetch_call()),
        ]);
        let (orchestrator, provider, dispatcher) = setup(
            vec![
                reply(response),
                reply(LlmResponse::text("Registered.")),
                reply(LlmResponse::text("Listed.")),
            ],
            StubDispatcher::default(),
        );
        let mut session = Session::new();

        let outcome = orchestrator.handle_input(&mut session, "do both").await;

        assert_eq!(outcome.dispatches, 2);
        assert_eq!(dispatcher.call_count(), 2);
        assert_eq!(provider.call_count(), 3);
        assert_eq!(outcome.turns.first().unwrap().text, "On it.");
        assert_eq!(outcome.turns.last().unwrap().text, "Listed.");

        // Each follow-up names only its own call
        let second = &provider.requests()[2];
        let model = &second[second.len() - 2];
        let calls: Vec<_> = model
            .parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::FunctionCall { call } => Some(call.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(calls, vec!["fetch_all_users"]);
    }
}
