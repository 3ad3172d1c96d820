//! User CRUD routes.
//!
//! Every route is audited; all but the public creation route sit behind the
//! authorization gate for the "usuarios" module. Gate and audit are ordered
//! so the gate runs first: rejected requests are never audited, while the
//! public create records a null actor.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;

use guarita_core::{Action, UserId};
use guarita_usuarios::{
    NovoUsuario, PasswordScorer, PasswordStrength, UserStore, UsuarioUpdate, WelcomeMailer,
    validate_email, validate_nome, validate_senha,
};

use crate::app::dto::{CreateUsuarioRequest, UpdateUsuarioRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::audit::AuditRoute;
use crate::middleware::RouteGuard;

const MODULO: &str = "usuarios";

pub fn router(services: Arc<AppServices>) -> Router {
    let gate = |action: Action| {
        axum::middleware::from_fn_with_state(
            RouteGuard::new(services.clone(), MODULO, action),
            crate::middleware::authorization_gate,
        )
    };
    let audit = |action: Action| {
        axum::middleware::from_fn_with_state(
            AuditRoute::new(services.recorder.clone(), MODULO, action),
            crate::audit::audit_trail,
        )
    };

    // Public by design: creation carries no gate but is still audited.
    let publico = Router::new()
        .route("/", post(create_usuario))
        .route_layer(audit(Action::Create));

    let leitura = Router::new()
        .route("/", get(list_usuarios))
        .route("/:id", get(get_usuario))
        .route_layer(audit(Action::Read))
        .route_layer(gate(Action::Read));

    let escrita = Router::new()
        .route("/:id", put(update_usuario).patch(patch_usuario))
        .route_layer(audit(Action::Update))
        .route_layer(gate(Action::Update));

    let remocao = Router::new()
        .route("/:id", delete(delete_usuario))
        .route_layer(audit(Action::Delete))
        .route_layer(gate(Action::Delete));

    publico.merge(leitura).merge(escrita).merge(remocao)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /usuarios
pub async fn list_usuarios(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let usuarios = services
        .usuarios
        .find_all()
        .await
        .map_err(|e| ApiError::unexpected("Erro ao buscar usuários", e))?;

    Ok((StatusCode::OK, Json(usuarios)).into_response())
}

/// GET /usuarios/:id
pub async fn get_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let usuario = services
        .usuarios
        .find_one(id)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao buscar usuário", e))?
        .ok_or_else(not_found)?;

    Ok((StatusCode::OK, Json(usuario)).into_response())
}

/// POST /usuarios — public creation route.
pub async fn create_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateUsuarioRequest>,
) -> Result<Response, ApiError> {
    let (Some(nome), Some(email), Some(senha)) = (
        body.nome.filter(|s| !s.is_empty()),
        body.email.filter(|s| !s.is_empty()),
        body.senha.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Nome, email e senha são obrigatórios.".to_string(),
        ));
    };

    validate_nome(&nome)?;
    let nome = nome.trim().to_string();

    validate_email(&email)?;
    let email = email.trim().to_lowercase();

    validate_senha(&senha)?;
    if services.scorer.strength(&senha) == PasswordStrength::Weak {
        return Err(ApiError::Validation("Senha muito fraca.".to_string()));
    }

    let existing = services
        .usuarios
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao criar usuário", e))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email já está em uso.".to_string()));
    }

    let usuario = services
        .usuarios
        .create(NovoUsuario { nome, email, senha })
        .await
        .map_err(|e| ApiError::unexpected("Erro ao criar usuário", e))?;

    // Welcome mail is best-effort: the user exists either way.
    if let Err(err) = services
        .mailer
        .send_welcome(&usuario.email, &usuario.nome)
        .await
    {
        tracing::warn!(error = %err, "user created but welcome mail failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Usuário criado com sucesso" })),
    )
        .into_response())
}

/// PUT /usuarios/:id — validated field-wise update.
pub async fn update_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUsuarioRequest>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let exists = services
        .usuarios
        .find_one(id)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao atualizar usuário", e))?
        .is_some();
    if !exists {
        return Err(not_found());
    }

    let mut update = UsuarioUpdate::default();

    if let Some(nome) = body.nome {
        validate_nome(&nome)?;
        update.nome = Some(nome.trim().to_string());
    }

    if let Some(email) = body.email {
        validate_email(&email)?;
        let email = email.trim().to_lowercase();

        let other = services
            .usuarios
            .find_by_email(&email)
            .await
            .map_err(|e| ApiError::unexpected("Erro ao atualizar usuário", e))?;
        if other.is_some_and(|u| u.id != id) {
            return Err(ApiError::Conflict(
                "Email já está em uso por outro usuário.".to_string(),
            ));
        }

        update.email = Some(email);
    }

    if let Some(senha) = body.senha {
        if senha.is_empty() {
            return Err(ApiError::Validation("A senha não pode ser vazia.".to_string()));
        }
        if services.scorer.strength(&senha) == PasswordStrength::Weak {
            return Err(ApiError::Validation("Senha muito fraca.".to_string()));
        }
        update.senha = Some(senha);
    }

    if update.is_empty() {
        return Err(ApiError::Validation(
            "Nenhum dado válido fornecido para atualização.".to_string(),
        ));
    }

    services
        .usuarios
        .update(id, update)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao atualizar usuário", e))?;

    Ok(updated_message())
}

/// PATCH /usuarios/:id — raw partial update.
pub async fn patch_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(update): Json<UsuarioUpdate>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let updated = services
        .usuarios
        .update(id, update)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao atualizar usuário", e))?;
    if updated.is_none() {
        return Err(not_found());
    }

    Ok(updated_message())
}

/// DELETE /usuarios/:id
pub async fn delete_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let removed = services
        .usuarios
        .remove(id)
        .await
        .map_err(|e| ApiError::unexpected("Erro ao remover usuário", e))?;
    if !removed {
        return Err(not_found());
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Usuário removido com sucesso" })),
    )
        .into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Route ids are UUIDs; anything unparsable cannot name an existing user.
fn parse_id(id: &str) -> Result<UserId, ApiError> {
    id.parse().map_err(|_| not_found())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Usuário não encontrado.".to_string())
}

fn updated_message() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": "Usuário atualizado com sucesso" })),
    )
        .into_response()
}
