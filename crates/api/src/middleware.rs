//! Authorization gate: authentication + permission check, per route.
//!
//! Applied opt-in per route (public routes simply don't carry it), so the
//! routing layer decides where the gate runs. On success the resolved
//! identity is attached to the request for the handler and the audit stage.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use guarita_auth::ResolveError;
use guarita_core::Action;

use crate::app::{errors, services::AppServices};
use crate::context::CurrentUser;

/// Per-route gate parameters: which (module, action) this route requires.
#[derive(Clone)]
pub struct RouteGuard {
    services: Arc<AppServices>,
    modulo: &'static str,
    action: Action,
}

impl RouteGuard {
    pub fn new(services: Arc<AppServices>, modulo: &'static str, action: Action) -> Self {
        Self {
            services,
            modulo,
            action,
        }
    }
}

/// Two-stage pipeline step: resolve the identity, then check the permission
/// graph. Failures short-circuit before any business or audit logic runs.
pub async fn authorization_gate(
    State(guard): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match guard
        .services
        .resolver
        .resolve(authorization, Utc::now())
        .await
    {
        Ok(identity) => identity,
        Err(err) => return resolve_failure(&err),
    };

    match guard
        .services
        .graph
        .is_allowed(identity.user_id, guard.modulo, guard.action)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_message(StatusCode::FORBIDDEN, "Acesso negado");
        }
        Err(err) => {
            return errors::json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro ao verificar permissões: {err}"),
            );
        }
    }

    req.extensions_mut().insert(CurrentUser::new(identity));
    next.run(req).await
}

fn resolve_failure(err: &ResolveError) -> Response {
    match err {
        // Lookup I/O failure is not an authentication verdict.
        ResolveError::Directory(inner) => errors::json_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao consultar usuário: {inner}"),
        ),
        _ => errors::json_message(StatusCode::UNAUTHORIZED, err.public_message()),
    }
}
