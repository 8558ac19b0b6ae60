//! Tool catalog and dispatch
//!
//! The LLM is offered exactly two functions, both backed by the registration
//! service:
//!
//! ```text
//! ┌──────────────┐  ToolCallRequest   ┌──────────────────┐  POST /<tool>  ┌──────────────────────┐
//! │ Orchestrator │ ─────────────────▶ │ HttpToolDispatcher│ ─────────────▶ │ Registration service │
//! │              │ ◀───────────────── │                  │ ◀───────────── │                      │
//! └──────────────┘  ToolCallResult    └──────────────────┘     JSON       └──────────────────────┘
//! ```
//!
//! Unknown tool names never leave the process: the dispatcher answers them
//! with an error result.

mod catalog;
mod dispatcher;

pub use catalog::{declared_tools, SupportedTool};
pub(crate) use catalog::title_case;
pub use dispatcher::{HttpToolDispatcher, ToolDispatcher};
