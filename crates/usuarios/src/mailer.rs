//! External collaborator: welcome e-mail delivery.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

/// Sends the post-signup welcome message.
///
/// Delivery failure must never fail user creation; callers log and move on.
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    async fn send_welcome(&self, email: &str, nome: &str) -> Result<(), MailError>;
}
