//! Diagnostic event log.
//!
//! An append-only sequence of human-readable event strings, one per visibility
//! change or filter step. This is an observability side-channel, not a
//! contract: nothing downstream depends on the wording. Every entry is also
//! emitted as a `tracing` debug event.

/// Append-only diagnostic log for one render session.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event, mirroring it to `tracing`.
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "trialgraph", "{message}");
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
