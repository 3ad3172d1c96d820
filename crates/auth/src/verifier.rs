//! Bearer-token verification (HS256).
//!
//! Decoding/signature checking is delegated to `jsonwebtoken`; temporal
//! validation is done separately by [`validate_claims`] so it stays
//! deterministic and testable with an injected clock.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{Claims, validate_claims};

/// Verification configuration, constructed once at startup.
///
/// The secret is injected here rather than read from the environment at
/// verification time, so the verifier is testable with arbitrary secrets.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never print the secret.
        f.debug_struct("TokenConfig").finish_non_exhaustive()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The token structure could not be decoded.
    #[error("token is malformed")]
    Malformed,

    /// The structure decoded but the signature does not match.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token is past its expiration timestamp.
    #[error("token has expired")]
    Expired,
}

/// Verifies bearer tokens against a process-wide secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: TokenConfig) -> Self {
        let key = DecodingKey::from_secret(&config.secret);

        // Signature-only validation: expiry is checked by `validate_claims`
        // with the caller's clock, not by the JWT library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self { key, validation }
    }

    /// Verify signature and structure, then the temporal claims at `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(classify_decode_error)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> VerifyError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => VerifyError::Malformed,
        _ => VerifyError::InvalidSignature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use guarita_core::UserId;
    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn mint(secret: &str, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: UserId::new(),
            email: "ana@example.com".to_string(),
            is_active: true,
            issued_at,
            expires_at,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(TokenConfig::new(SECRET))
    }

    #[test]
    fn verifies_valid_token() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = mint(SECRET, now, now + Duration::minutes(10));

        let claims = verifier().verify(&token, now).unwrap();
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.is_active);
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let token = mint("other-secret", now, now + Duration::minutes(10));

        assert_eq!(
            verifier().verify(&token, now),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_garbage_as_malformed() {
        let now = Utc::now();
        assert_eq!(
            verifier().verify("not-a-jwt", now),
            Err(VerifyError::Malformed)
        );
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        // exp ten minutes in the past
        let token = mint(SECRET, now - Duration::hours(1), now - Duration::minutes(10));

        assert_eq!(verifier().verify(&token, now), Err(VerifyError::Expired));
    }
}
