//! Read model of the RBAC graph: modules, permissions, roles, profiles.
//!
//! These records are owned by their own CRUD collaborators; this crate only
//! reads them through [`PolicyStore`] to answer authorization questions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use guarita_core::{Action, ModuloId, PerfilId, PermissaoId, RoleId, UserId};

/// Named capability domain (e.g. "usuarios", "auditoria").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modulo {
    pub id: ModuloId,
    pub nome: String,
}

/// An allowed action on a module. Unique per (modulo, action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissao {
    pub id: PermissaoId,
    pub modulo_id: ModuloId,
    pub action: Action,
}

/// Named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub nome: String,
    pub permissao_ids: Vec<PermissaoId>,
}

/// Named bundle of roles assigned to users.
///
/// A user holds at most one active profile at a time; assignment is the
/// store's concern and replaces any previous profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perfil {
    pub id: PerfilId,
    pub nome: String,
    pub role_ids: Vec<RoleId>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("policy lookup failed: {0}")]
pub struct PolicyError(pub String);

/// External collaborator: the RBAC graph source.
///
/// Dangling references (a role pointing at a deleted permission, a
/// permission pointing at a deleted module) are represented as `Ok(None)`
/// from the per-record getters; graph consistency is not assumed to be
/// externally enforced.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// The user's active profile, if any.
    async fn perfil_of(&self, user: UserId) -> Result<Option<Perfil>, PolicyError>;

    async fn role(&self, id: RoleId) -> Result<Option<Role>, PolicyError>;

    async fn permissao(&self, id: PermissaoId) -> Result<Option<Permissao>, PolicyError>;

    async fn modulo(&self, id: ModuloId) -> Result<Option<Modulo>, PolicyError>;
}
