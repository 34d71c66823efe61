//! Diagnostic sink for anomalies that do not warrant an error.

use std::sync::Mutex;

/// Receives warnings raised while decoding or encoding metadata.
pub trait DiagnosticSink: Send + Sync + std::fmt::Debug {
    /// Report an anomalous but recoverable condition.
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "meta_relay::metadata", "{}", message);
    }
}

/// Keeps warnings in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("memory sink mutex poisoned")
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages
            .lock()
            .expect("memory sink mutex poisoned")
            .is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .expect("memory sink mutex poisoned")
            .push(message.to_string());
    }
}
