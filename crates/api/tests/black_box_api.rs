use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use guarita_api::app::services::{AppServices, MemoryBackends, build_memory_services};
use guarita_audit::{AuditEntry, AuditSink, AuditWriteError, Outcome};
use guarita_auth::{Claims, TokenConfig};
use guarita_core::{Action, UserId};
use guarita_infra::{
    BasicPasswordScorer, LogMailer, MemoryPolicyStore, MemoryUserStore, seed_profile,
};
use guarita_usuarios::Usuario;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Bind the given app (same router as prod) to an ephemeral port.
    async fn spawn(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Standard wiring: in-memory backends, one active seeded user.
async fn spawn_with_user() -> (TestServer, MemoryBackends, UserId) {
    let (services, backends) = build_memory_services(JWT_SECRET.to_string());
    let user_id = seed_usuario(&backends, "Ana", "ana@example.com", true);
    let srv = TestServer::spawn(guarita_api::app::build_app(services)).await;
    (srv, backends, user_id)
}

fn seed_usuario(backends: &MemoryBackends, nome: &str, email: &str, is_active: bool) -> UserId {
    let id = UserId::new();
    backends.usuarios.insert(Usuario {
        id,
        nome: nome.to_string(),
        email: email.to_string(),
        senha_hash: "s3nh4-forte!".to_string(),
        is_active,
    });
    id
}

fn mint_jwt(secret: &str, sub: UserId, ttl_minutes: i64) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub,
        email: "ana@example.com".to_string(),
        is_active: true,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(ttl_minutes),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

// ─────────────────────────────────────────────────────────────────────────────
// /auth/validate
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn validate_reports_user_and_token_metadata() {
    let (srv, _backends, user_id) = spawn_with_user().await;
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let res = reqwest::Client::new()
        .post(format!("{}/auth/validate", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["id"].as_str().unwrap(), user_id.to_string());
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["is_active"], true);

    let remaining = body["token_info"]["expires_in_seconds"].as_i64().unwrap();
    assert!(remaining > 0 && remaining <= 600);

    // dd/mm/yyyy, hh:mm:ss
    let expires_at = body["token_info"]["expires_at"].as_str().unwrap();
    assert_eq!(expires_at.len(), "01/01/2024, 00:00:00".len());
    assert_eq!(&expires_at[2..3], "/");
}

#[tokio::test]
async fn validate_rejects_expired_token_with_specific_reason() {
    let (srv, _backends, user_id) = spawn_with_user().await;
    // exp ten minutes in the past
    let token = mint_jwt(JWT_SECRET, user_id, -10);

    let res = reqwest::Client::new()
        .post(format!("{}/auth/validate", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "valid": false, "error": "Token expirado" }));
}

#[tokio::test]
async fn validate_distinguishes_every_failure_reason() {
    let (srv, backends, _user_id) = spawn_with_user().await;
    let client = reqwest::Client::new();
    let url = format!("{}/auth/validate", srv.base_url);

    // No credential at all.
    let res = client.post(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Token não fornecido");

    // Structurally broken token.
    let res = client.post(&url).bearer_auth("not-a-jwt").send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Token malformado");

    // Well-formed but signed with another secret.
    let forged = mint_jwt("other-secret", UserId::new(), 10);
    let res = client.post(&url).bearer_auth(forged).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Token inválido");

    // Valid signature, no such user.
    let stranger = mint_jwt(JWT_SECRET, UserId::new(), 10);
    let res = client.post(&url).bearer_auth(stranger).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Usuário não encontrado");

    // Valid signature, deactivated user.
    let inactive = seed_usuario(&backends, "Bia", "bia@example.com", false);
    let token = mint_jwt(JWT_SECRET, inactive, 10);
    let res = client.post(&url).bearer_auth(token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Usuário inativo");
}

// ─────────────────────────────────────────────────────────────────────────────
// /auth/check
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_answers_with_the_bare_verdict_only() {
    let (srv, backends, user_id) = spawn_with_user().await;
    let client = reqwest::Client::new();
    let url = format!("{}/auth/check", srv.base_url);

    let res = client
        .post(&url)
        .bearer_auth(mint_jwt(JWT_SECRET, user_id, 10))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "valid": true }));

    // Every failure cause collapses to the same masked body.
    let inactive = seed_usuario(&backends, "Bia", "bia@example.com", false);
    let failures = [
        None,
        Some("not-a-jwt".to_string()),
        Some(mint_jwt(JWT_SECRET, user_id, -10)),
        Some(mint_jwt("other-secret", user_id, 10)),
        Some(mint_jwt(JWT_SECRET, UserId::new(), 10)),
        Some(mint_jwt(JWT_SECRET, inactive, 10)),
    ];

    for token in failures {
        let mut req = client.post(&url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "valid": false }));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization gate
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn protected_routes_require_a_credential() {
    let (srv, _backends, _user_id) = spawn_with_user().await;

    let res = reqwest::Client::new()
        .get(format!("{}/usuarios", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Token não fornecido");
}

#[tokio::test]
async fn read_only_profile_cannot_delete() {
    let (srv, backends, user_id) = spawn_with_user().await;
    seed_profile(&backends.policy, user_id, "usuarios", &[Action::Read]);
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, user_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Acesso negado");

    // The same credential can still read.
    let res = client
        .get(format!("{}/usuarios/{}", srv.base_url, user_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "ana@example.com");
}

#[tokio::test]
async fn user_without_profile_is_denied_by_default() {
    let (srv, _backends, user_id) = spawn_with_user().await;
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let res = reqwest::Client::new()
        .get(format!("{}/usuarios", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

// ─────────────────────────────────────────────────────────────────────────────
// Audit trail
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn audited_read_records_exactly_one_entry() {
    let (srv, backends, user_id) = spawn_with_user().await;
    seed_profile(&backends.policy, user_id, "usuarios", &[Action::Read]);
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let res = reqwest::Client::new()
        .get(format!("{}/usuarios/{}", srv.base_url, user_id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let trail = backends.audit.snapshot();
    assert_eq!(trail.len(), 1);

    let entry = &trail[0];
    assert_eq!(entry.user_id, Some(user_id));
    assert_eq!(entry.action, Action::Read);
    assert_eq!(entry.resource, "usuarios");
    assert_eq!(entry.resource_id.as_deref(), Some(user_id.to_string().as_str()));
    assert_eq!(entry.outcome, Outcome::Success);
    assert_eq!(entry.detail, None);
}

#[tokio::test]
async fn anonymous_create_is_audited_with_null_actor() {
    let (srv, backends, _user_id) = spawn_with_user().await;

    let res = reqwest::Client::new()
        .post(format!("{}/usuarios", srv.base_url))
        .json(&json!({
            "nome": "Bruno Lima",
            "email": "bruno@example.com",
            "senha": "S3nh4!forte",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Usuário criado com sucesso");

    let trail = backends.audit.snapshot();
    assert_eq!(trail.len(), 1);

    let entry = &trail[0];
    assert_eq!(entry.user_id, None);
    assert_eq!(entry.action, Action::Create);
    assert_eq!(entry.resource, "usuarios");
    assert_eq!(entry.resource_id, None);
    assert_eq!(entry.outcome, Outcome::Success);
}

#[tokio::test]
async fn failed_handler_audits_failure_with_detail() {
    let (srv, backends, user_id) = spawn_with_user().await;
    seed_profile(&backends.policy, user_id, "usuarios", &[Action::Read]);
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let res = reqwest::Client::new()
        .get(format!("{}/usuarios/{}", srv.base_url, UserId::new()))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let trail = backends.audit.snapshot();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].outcome, Outcome::Failure);
    assert_eq!(trail[0].detail.as_deref(), Some("Usuário não encontrado."));
}

#[tokio::test]
async fn rejected_requests_are_not_audited() {
    let (srv, backends, user_id) = spawn_with_user().await;
    seed_profile(&backends.policy, user_id, "usuarios", &[Action::Read]);
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    // Forbidden (gate) — short-circuits before the audit stage.
    let res = reqwest::Client::new()
        .delete(format!("{}/usuarios/{}", srv.base_url, user_id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    assert!(backends.audit.snapshot().is_empty());
}

struct BrokenSink;

#[async_trait]
impl AuditSink for BrokenSink {
    async fn append(&self, _entry: AuditEntry) -> Result<(), AuditWriteError> {
        Err(AuditWriteError("disk full".to_string()))
    }
}

#[tokio::test]
async fn audit_write_failure_never_changes_the_response() {
    let usuarios = Arc::new(MemoryUserStore::new());
    let policy = Arc::new(MemoryPolicyStore::new());

    let services = Arc::new(AppServices::new(
        TokenConfig::new(JWT_SECRET.as_bytes().to_vec()),
        usuarios.clone(),
        policy.clone(),
        Arc::new(BrokenSink),
        usuarios.clone(),
        Arc::new(BasicPasswordScorer),
        Arc::new(LogMailer),
    ));

    let user_id = UserId::new();
    usuarios.insert(Usuario {
        id: user_id,
        nome: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        senha_hash: "s3nh4-forte!".to_string(),
        is_active: true,
    });
    seed_profile(&policy, user_id, "usuarios", &[Action::Read]);

    let srv = TestServer::spawn(guarita_api::app::build_app(services)).await;
    let token = mint_jwt(JWT_SECRET, user_id, 10);

    let res = reqwest::Client::new()
        .get(format!("{}/usuarios/{}", srv.base_url, user_id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "ana@example.com");
}

// ─────────────────────────────────────────────────────────────────────────────
// /usuarios CRUD behavior
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_validates_fields_and_conflicts() {
    let (srv, _backends, _user_id) = spawn_with_user().await;
    let client = reqwest::Client::new();
    let url = format!("{}/usuarios", srv.base_url);

    // Missing fields.
    let res = client.post(&url).json(&json!({ "nome": "Bruno" })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Nome, email e senha são obrigatórios.");

    // Weak password.
    let res = client
        .post(&url)
        .json(&json!({ "nome": "Bruno Lima", "email": "bruno@example.com", "senha": "123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Senha muito fraca.");

    // Invalid e-mail gets the staged diagnostic.
    let res = client
        .post(&url)
        .json(&json!({ "nome": "Bruno Lima", "email": "bruno.example.com", "senha": "S3nh4!forte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "O email deve conter o símbolo '@'.");

    // Duplicate e-mail (seeded user) is a conflict, case-insensitively.
    let res = client
        .post(&url)
        .json(&json!({ "nome": "Ana Clone", "email": "ANA@example.com", "senha": "S3nh4!forte" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Email já está em uso.");
}

#[tokio::test]
async fn update_lifecycle_with_update_grant() {
    let (srv, backends, user_id) = spawn_with_user().await;
    seed_profile(
        &backends.policy,
        user_id,
        "usuarios",
        &[Action::Read, Action::Update],
    );
    let token = mint_jwt(JWT_SECRET, user_id, 10);
    let client = reqwest::Client::new();
    let url = format!("{}/usuarios/{}", srv.base_url, user_id);

    // Empty update set is rejected.
    let res = client.put(&url).bearer_auth(&token).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Nenhum dado válido fornecido para atualização.");

    // Valid rename.
    let res = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "nome": "Ana Maria" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Usuário atualizado com sucesso");

    let res = client.get(&url).bearer_auth(&token).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["nome"], "Ana Maria");

    // Rejected empty update, successful update, one read: three entries.
    let trail = backends.audit.snapshot();
    assert_eq!(trail.len(), 3);
    let updates: Vec<_> = trail.iter().filter(|e| e.action == Action::Update).collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].outcome, Outcome::Failure);
    assert_eq!(updates[1].outcome, Outcome::Success);
}

#[tokio::test]
async fn delete_with_grant_removes_and_audits() {
    let (srv, backends, user_id) = spawn_with_user().await;
    let victim = seed_usuario(&backends, "Caio", "caio@example.com", true);
    seed_profile(
        &backends.policy,
        user_id,
        "usuarios",
        &[Action::Read, Action::Delete],
    );
    let token = mint_jwt(JWT_SECRET, user_id, 10);
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, victim))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Usuário removido com sucesso");

    let res = client
        .get(format!("{}/usuarios/{}", srv.base_url, victim))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Usuário não encontrado.");

    let trail = backends.audit.snapshot();
    let deletes: Vec<_> = trail.iter().filter(|e| e.action == Action::Delete).collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].user_id, Some(user_id));
    assert_eq!(deletes[0].outcome, Outcome::Success);
    assert_eq!(
        deletes[0].resource_id.as_deref(),
        Some(victim.to_string().as_str())
    );
}
