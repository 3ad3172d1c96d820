//! Identity resolution: bearer header → verified claims → live user record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use guarita_core::UserId;

use crate::directory::{DirectoryError, UserDirectory};
use crate::verifier::{TokenVerifier, VerifyError};

const BEARER_PREFIX: &str = "Bearer ";

/// A fully resolved, authenticated identity.
///
/// `email`/`is_active` are re-read from the user record, not copied from the
/// token; the embedded claim values are issuance-time snapshots only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: String,
    pub is_active: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedIdentity {
    /// Seconds until the credential expires at `now`.
    ///
    /// May be negative transiently between verification and response
    /// formatting; callers should treat a negative value as already expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.expires_at.timestamp() - now.timestamp()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No `Authorization` header, or not a `Bearer` credential.
    #[error("missing credential")]
    MissingCredential,

    /// Token structure could not be decoded.
    #[error("malformed token")]
    Malformed,

    /// Signature mismatch.
    #[error("invalid token")]
    Invalid,

    /// Token past its expiry.
    #[error("expired token")]
    Expired,

    /// Claims verified but the subject has no user record.
    #[error("unknown subject")]
    UnknownSubject,

    /// The subject's account is deactivated.
    #[error("inactive subject")]
    InactiveSubject,

    /// User lookup I/O failed. Not an authentication verdict.
    #[error("{0}")]
    Directory(#[from] DirectoryError),
}

impl ResolveError {
    /// Stable, user-visible reason string (contract with API clients).
    pub fn public_message(&self) -> &'static str {
        match self {
            ResolveError::MissingCredential => "Token não fornecido",
            ResolveError::Malformed => "Token malformado",
            ResolveError::Invalid => "Token inválido",
            ResolveError::Expired => "Token expirado",
            ResolveError::UnknownSubject => "Usuário não encontrado",
            ResolveError::InactiveSubject => "Usuário inativo",
            ResolveError::Directory(_) => "Erro ao consultar usuário",
        }
    }
}

impl From<VerifyError> for ResolveError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Malformed => ResolveError::Malformed,
            VerifyError::InvalidSignature => ResolveError::Invalid,
            VerifyError::Expired => ResolveError::Expired,
        }
    }
}

/// Maps a bearer credential to an authenticated identity.
pub struct IdentityResolver {
    verifier: TokenVerifier,
    directory: Arc<dyn UserDirectory>,
}

impl IdentityResolver {
    pub fn new(verifier: TokenVerifier, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            verifier,
            directory,
        }
    }

    /// Resolve the `Authorization` header value into a live identity.
    pub async fn resolve(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, ResolveError> {
        let token = extract_bearer(authorization)?;
        let claims = self.verifier.verify(token, now)?;

        let usuario = self
            .directory
            .find_by_id(claims.sub)
            .await?
            .ok_or(ResolveError::UnknownSubject)?;

        if !usuario.is_active {
            return Err(ResolveError::InactiveSubject);
        }

        Ok(AuthenticatedIdentity {
            user_id: usuario.id,
            email: usuario.email,
            is_active: usuario.is_active,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        })
    }

    /// Lightweight check mode: a bare verdict, no failure reason.
    ///
    /// Health-check-style callers get `true`/`false` and nothing else; every
    /// failure cause (including lookup I/O errors) collapses to `false`.
    pub async fn check(&self, authorization: Option<&str>, now: DateTime<Utc>) -> bool {
        self.resolve(authorization, now).await.is_ok()
    }
}

fn extract_bearer(authorization: Option<&str>) -> Result<&str, ResolveError> {
    let header = authorization.ok_or(ResolveError::MissingCredential)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(ResolveError::MissingCredential)?
        .trim();

    if token.is_empty() {
        return Err(ResolveError::MissingCredential);
    }

    Ok(token)
}
