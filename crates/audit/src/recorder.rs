//! Append-only sink trait and the failure-swallowing recorder.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::entry::AuditEntry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("audit write failed: {0}")]
pub struct AuditWriteError(pub String);

/// External collaborator: the audit store.
///
/// Append-only by contract; implementations must not expose mutation.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditWriteError>;
}

/// Writes audit entries as a non-fatal side effect.
///
/// A failed write must never turn a successful business operation into a
/// failed response: errors are reported through the log side channel and
/// swallowed.
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append `entry`, reporting (not propagating) sink failures.
    pub async fn record(&self, entry: AuditEntry) {
        let resource = entry.resource.clone();
        let action = entry.action;

        if let Err(err) = self.sink.append(entry).await {
            tracing::error!(
                error = %err,
                resource = %resource,
                action = %action,
                "audit write failed; request outcome is unaffected"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Outcome;
    use chrono::Utc;
    use guarita_core::Action;
    use std::sync::Mutex;

    struct RecordingSink {
        entries: Mutex<Vec<AuditEntry>>,
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn append(&self, entry: AuditEntry) -> Result<(), AuditWriteError> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl AuditSink for BrokenSink {
        async fn append(&self, _entry: AuditEntry) -> Result<(), AuditWriteError> {
            Err(AuditWriteError("disk full".to_string()))
        }
    }

    fn entry() -> AuditEntry {
        AuditEntry::new(
            None,
            Action::Read,
            "usuarios",
            Some("5".to_string()),
            Outcome::Success,
            None,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn records_through_the_sink() {
        let sink = Arc::new(RecordingSink {
            entries: Mutex::new(Vec::new()),
        });
        let recorder = AuditRecorder::new(sink.clone());

        recorder.record(entry()).await;

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resource, "usuarios");
        assert_eq!(entries[0].outcome, Outcome::Success);
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(BrokenSink));
        // Must not panic or propagate.
        recorder.record(entry()).await;
    }
}
