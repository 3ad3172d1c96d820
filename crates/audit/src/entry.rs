use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use guarita_core::{Action, AuditEntryId, UserId};

/// Outcome of the operation an entry records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// An immutable audit fact.
///
/// `user_id` is `None` for actions taken without an authenticated identity
/// (public routes are still audited); `resource_id` is `None` for list and
/// create operations, where no route id exists at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub user_id: Option<UserId>,
    pub action: Action,
    pub resource: String,
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Build an entry stamped `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Option<UserId>,
        action: Action,
        resource: impl Into<String>,
        resource_id: Option<String>,
        outcome: Outcome,
        detail: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            user_id,
            action,
            resource: resource.into(),
            resource_id,
            timestamp: now,
            outcome,
            detail,
        }
    }
}
