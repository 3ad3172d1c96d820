//! Collaborator wiring for the request pipeline.

use std::sync::Arc;

use guarita_audit::{AuditRecorder, AuditSink};
use guarita_auth::{
    IdentityResolver, PermissionGraph, PolicyStore, TokenConfig, TokenVerifier, UserDirectory,
};
use guarita_infra::{
    BasicPasswordScorer, LogMailer, MemoryAuditSink, MemoryPolicyStore, MemoryUserStore,
};
use guarita_usuarios::{PasswordScorer, UserStore, WelcomeMailer};

/// Everything the routes and pipeline stages need, wired once at startup.
pub struct AppServices {
    pub resolver: IdentityResolver,
    pub graph: PermissionGraph,
    pub recorder: Arc<AuditRecorder>,
    pub usuarios: Arc<dyn UserStore>,
    pub scorer: Arc<dyn PasswordScorer>,
    pub mailer: Arc<dyn WelcomeMailer>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token_config: TokenConfig,
        directory: Arc<dyn UserDirectory>,
        policy: Arc<dyn PolicyStore>,
        audit_sink: Arc<dyn AuditSink>,
        usuarios: Arc<dyn UserStore>,
        scorer: Arc<dyn PasswordScorer>,
        mailer: Arc<dyn WelcomeMailer>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(TokenVerifier::new(token_config), directory),
            graph: PermissionGraph::new(policy),
            recorder: Arc::new(AuditRecorder::new(audit_sink)),
            usuarios,
            scorer,
            mailer,
        }
    }
}

/// Handles on the in-memory backends, for seeding and inspection.
pub struct MemoryBackends {
    pub usuarios: Arc<MemoryUserStore>,
    pub policy: Arc<MemoryPolicyStore>,
    pub audit: Arc<MemoryAuditSink>,
}

/// Wire [`AppServices`] over the in-memory adapters (dev/test wiring).
pub fn build_memory_services(jwt_secret: String) -> (Arc<AppServices>, MemoryBackends) {
    let usuarios = Arc::new(MemoryUserStore::new());
    let policy = Arc::new(MemoryPolicyStore::new());
    let audit = Arc::new(MemoryAuditSink::new());

    let services = AppServices::new(
        TokenConfig::new(jwt_secret.into_bytes()),
        usuarios.clone(),
        policy.clone(),
        audit.clone(),
        usuarios.clone(),
        Arc::new(BasicPasswordScorer),
        Arc::new(LogMailer),
    );

    (
        Arc::new(services),
        MemoryBackends {
            usuarios,
            policy,
            audit,
        },
    )
}
