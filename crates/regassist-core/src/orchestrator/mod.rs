//! Conversation orchestration
//!
//! One pass per user input:
//!
//! ```text
//! Idle ─▶ AwaitingLlm ─┬─▶ RespondingText ───────────────────────────┬─▶ Idle
//!                      └─▶ DispatchingTool ─▶ AwaitingFollowUp ──────┘
//! ```
//!
//! The orchestrator never renders anything itself; each pass returns a
//! [`TurnOutcome`] for the front-end to display.

mod assistant;
mod error;
mod outcome;
mod session;
mod state;

pub use assistant::Orchestrator;
pub use error::AssistantError;
pub use outcome::{Notice, NoticeLevel, TurnOutcome};
pub use session::{Session, GREETING};
pub use state::OrchestratorState;
