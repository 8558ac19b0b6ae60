//! Logger backed by `tracing`

use super::traits::Logger;

/// A logger that emits `tracing` events
///
/// Every event carries the component name as the `component` field, so one
/// subscriber can filter the store, the service and the orchestrator apart.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    /// Create a tracing logger with the default component name
    pub fn new() -> Self {
        Self {
            component: "regassist".to_string(),
        }
    }

    /// Create a tracing logger for a named component
    pub fn for_component(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(component = %self.component, "{message}");
    }
}
