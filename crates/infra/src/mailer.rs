//! Logging mail adapter.

use async_trait::async_trait;

use guarita_usuarios::{MailError, WelcomeMailer};

/// Welcome-mail adapter that only logs.
///
/// Real delivery is an external collaborator; dev/test wiring uses this.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl WelcomeMailer for LogMailer {
    async fn send_welcome(&self, email: &str, nome: &str) -> Result<(), MailError> {
        tracing::info!(email, nome, "welcome mail (log only)");
        Ok(())
    }
}
