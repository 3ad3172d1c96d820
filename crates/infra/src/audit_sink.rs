//! In-memory append-only audit sink.

use std::sync::RwLock;

use async_trait::async_trait;

use guarita_audit::{AuditEntry, AuditSink, AuditWriteError};

/// In-memory audit sink.
///
/// Intended for tests/dev. Append-only: the only read access is a snapshot
/// copy, so recorded entries cannot be altered through this type.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the trail so far (test/inspection helper).
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditWriteError> {
        self.entries
            .write()
            .map_err(|_| AuditWriteError("lock poisoned".to_string()))?
            .push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guarita_audit::Outcome;
    use guarita_core::Action;

    #[tokio::test]
    async fn appends_in_order() {
        let sink = MemoryAuditSink::new();

        for resource in ["usuarios", "auditoria"] {
            sink.append(AuditEntry::new(
                None,
                Action::Read,
                resource,
                None,
                Outcome::Success,
                None,
                Utc::now(),
            ))
            .await
            .unwrap();
        }

        let snapshot = sink.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].resource, "usuarios");
        assert_eq!(snapshot[1].resource, "auditoria");
    }
}
