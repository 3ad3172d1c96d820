//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: collaborator wiring (resolver, graph, recorder, stores)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .nest("/usuarios", routes::usuarios::router(services.clone()))
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
