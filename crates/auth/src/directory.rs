//! Read-only view of the user store, as seen by the identity resolver.

use async_trait::async_trait;
use thiserror::Error;

use guarita_core::UserId;

/// The slice of a user record the resolver needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsuarioRegistro {
    pub id: UserId,
    pub nome: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("user lookup failed: {0}")]
pub struct DirectoryError(pub String);

/// External collaborator: authoritative user lookup.
///
/// Implementations own persistence; this crate only reads. `Ok(None)` means
/// "no such user" — infrastructure failures go through the error channel so
/// they are never mistaken for an authentication verdict.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UsuarioRegistro>, DirectoryError>;
}
