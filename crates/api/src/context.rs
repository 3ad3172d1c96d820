use guarita_auth::AuthenticatedIdentity;
use guarita_core::UserId;

/// Request-scoped identity, attached by the authorization gate.
///
/// Absent on public routes; downstream stages (handlers, audit) read it
/// from the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    identity: AuthenticatedIdentity,
}

impl CurrentUser {
    pub fn new(identity: AuthenticatedIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &AuthenticatedIdentity {
        &self.identity
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }
}
