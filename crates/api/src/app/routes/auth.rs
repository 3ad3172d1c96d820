//! Token validation endpoints.
//!
//! `/auth/validate` reports the full verdict with reason strings;
//! `/auth/check` is the masked mode and never leaks why a credential was
//! rejected.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use guarita_auth::ResolveError;

use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/validate", post(validate))
        .route("/check", post(check))
}

/// POST /auth/validate — full verdict on the presented credential.
pub async fn validate(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let now = Utc::now();

    match services.resolver.resolve(bearer(&headers), now).await {
        Ok(identity) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "user": {
                    "id": identity.user_id,
                    "email": identity.email,
                    "is_active": identity.is_active,
                },
                "token_info": {
                    "issued_at": format_date_time(identity.issued_at),
                    "expires_at": format_date_time(identity.expires_at),
                    "expires_in_seconds": identity.remaining_seconds(now),
                },
            })),
        )
            .into_response(),
        Err(ResolveError::Directory(err)) => errors::json_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Erro ao validar token: {err}"),
        ),
        Err(err) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "valid": false,
                "error": err.public_message(),
            })),
        )
            .into_response(),
    }
}

/// POST /auth/check — bare verdict, no reason, always 200.
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let valid = services.resolver.check(bearer(&headers), Utc::now()).await;
    Json(json!({ "valid": valid }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Day/month/year, 24-hour clock — the locale shape clients render as-is.
fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}
