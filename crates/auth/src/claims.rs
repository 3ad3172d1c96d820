use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use guarita_core::UserId;

use crate::verifier::VerifyError;

/// JWT claims model (transport-agnostic).
///
/// The `email`/`is_active` fields are snapshots taken at issuance time and
/// are advisory only; authoritative state is re-read from the user record by
/// the identity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user this token was issued to.
    pub sub: UserId,

    /// E-mail snapshot at issuance time.
    pub email: String,

    /// Active-flag snapshot at issuance time.
    pub is_active: bool,

    /// Issued-at timestamp (epoch seconds on the wire).
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp (epoch seconds on the wire).
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Seconds until expiry at `now`. Negative means already expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.expires_at.timestamp() - now.timestamp()
    }
}

/// Deterministically validate the temporal claims.
///
/// Signature verification / decoding is the verifier's job; this function
/// only answers "is this token expired at `now`?" so it stays a pure,
/// injectable function of its inputs.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), VerifyError> {
    if now >= claims.expires_at {
        return Err(VerifyError::Expired);
    }
    Ok(())
}
