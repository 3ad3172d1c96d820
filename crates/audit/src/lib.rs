//! `guarita-audit` — immutable audit trail of who did what, when, with
//! what outcome.
//!
//! The trail is append-only: entries are created exactly once per audited
//! request and never mutated or deleted by the application.

pub mod entry;
pub mod recorder;

pub use entry::{AuditEntry, Outcome};
pub use recorder::{AuditRecorder, AuditSink, AuditWriteError};
