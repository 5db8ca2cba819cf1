//! Leveled logging collaborator injected into the filter and pipeline.
//!
//! The default [`TracingLogger`] forwards to `tracing`; hosts that route
//! installer logs elsewhere implement [`Logger`] themselves.

use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn error(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn info(&self, msg: &str);
    fn debug(&self, msg: &str);
}

/// Forwards every message to the matching `tracing` macro.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, msg: &str) {
        tracing::error!(target: "artifetch", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "artifetch", "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "artifetch", "{}", msg);
    }

    fn debug(&self, msg: &str) {
        tracing::debug!(target: "artifetch", "{}", msg);
    }
}

pub fn tracing_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
