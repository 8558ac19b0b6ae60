//! Registration Assistant Core
//!
//! Building blocks for a chat assistant that registers users and lists them:
//!
//! - `store`: append-only CSV record store
//! - `registration`: HTTP registration service (axum) over the store
//! - `tools`: the two functions offered to the LLM and their HTTP dispatcher
//! - `providers`: LLM provider abstraction (genai-backed, plus a mock)
//! - `orchestrator`: drives one user input through LLM, tools and follow-up
//!
//! ```rust,ignore
//! use regassist_core::orchestrator::{Orchestrator, Session};
//!
//! let mut session = Session::with_greeting();
//! let outcome = orchestrator.handle_input(&mut session, "Show me all registered users").await;
//! for notice in &outcome.notices {
//!     println!("{}", notice.text);
//! }
//! ```

pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod providers;
pub mod registration;
pub mod secrets;
pub mod store;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{
    ChatMessage, ChatTurn, ContentPart, LlmPart, LlmResponse, MessageRole, Tool, ToolCallRequest,
    ToolCallResult, ToolErrorKind, ToolStatus, TurnRole, UserRecord,
};

pub use config::{AppConfig, ConfigError, ConfigResult};

pub use logging::{init_tracing, Logger, NoOpLogger, TracingLogger};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use store::{CsvRecordStore, RecordStore, StoreError};

pub use registration::{RegistrationError, RegistrationService};

pub use tools::{HttpToolDispatcher, SupportedTool, ToolDispatcher};

pub use providers::{create_provider, Provider, ProviderError, ProviderModelConfig};

pub use orchestrator::{AssistantError, Notice, NoticeLevel, Orchestrator, Session, TurnOutcome};
