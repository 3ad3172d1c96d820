//! Audit stage: one immutable entry per audited request.
//!
//! Layered inside the authorization gate, so rejected requests never reach
//! it; public-but-audited routes carry this stage alone and record a null
//! actor. The entry is written after the handler completes, with the
//! outcome taken from the actual response, and the write is a non-fatal
//! side effect (the recorder logs and swallows sink failures).

use std::sync::Arc;

use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use guarita_audit::{AuditEntry, AuditRecorder, Outcome};
use guarita_core::Action;

use crate::context::CurrentUser;

/// Error message carried out-of-band on failure responses, so the audit
/// stage can record a useful detail without buffering response bodies.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Per-route audit parameters: which (resource, action) this route records.
#[derive(Clone)]
pub struct AuditRoute {
    recorder: Arc<AuditRecorder>,
    resource: &'static str,
    action: Action,
}

impl AuditRoute {
    pub fn new(recorder: Arc<AuditRecorder>, resource: &'static str, action: Action) -> Self {
        Self {
            recorder,
            resource,
            action,
        }
    }
}

pub async fn audit_trail(
    State(route): State<AuditRoute>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Response {
    // List/create routes have no `id` capture; entries record no resource id.
    let resource_id = params
        .iter()
        .find(|(name, _)| *name == "id")
        .map(|(_, value)| value.to_string());

    let user_id = req
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.user_id());

    let res = next.run(req).await;

    let status = res.status();
    let outcome = if status.is_client_error() || status.is_server_error() {
        Outcome::Failure
    } else {
        Outcome::Success
    };
    let detail = res.extensions().get::<ErrorDetail>().map(|d| d.0.clone());

    route
        .recorder
        .record(AuditEntry::new(
            user_id,
            route.action,
            route.resource,
            resource_id,
            outcome,
            detail,
            Utc::now(),
        ))
        .await;

    res
}
