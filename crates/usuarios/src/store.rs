//! External collaborator: persistence of user records.

use async_trait::async_trait;
use thiserror::Error;

use guarita_core::UserId;

use crate::usuario::{NovoUsuario, Usuario, UsuarioUpdate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("user store failure: {0}")]
pub struct StoreError(pub String);

/// Full read/write surface over user records.
///
/// Each call is atomic on its own; multi-step sequences (e.g. uniqueness
/// check followed by create) are not transactional and may interleave with
/// concurrent writers. The store owns the at-rest password representation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Usuario>, StoreError>;

    async fn find_one(&self, id: UserId) -> Result<Option<Usuario>, StoreError>;

    /// Case-insensitive lookup; callers pass the e-mail already lowercased.
    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, StoreError>;

    async fn create(&self, novo: NovoUsuario) -> Result<Usuario, StoreError>;

    /// Apply the non-`None` fields. `Ok(None)` when the record is absent.
    async fn update(
        &self,
        id: UserId,
        update: UsuarioUpdate,
    ) -> Result<Option<Usuario>, StoreError>;

    /// `Ok(false)` when the record was already absent.
    async fn remove(&self, id: UserId) -> Result<bool, StoreError>;
}
