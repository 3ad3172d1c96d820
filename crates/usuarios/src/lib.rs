//! `guarita-usuarios` — user records and their collaborator interfaces.
//!
//! Persistence, e-mail delivery, and password-strength scoring are external
//! collaborators consumed through the traits defined here; only field
//! validation is owned by this crate.

pub mod mailer;
pub mod senha;
pub mod store;
pub mod usuario;
pub mod validate;

pub use mailer::{MailError, WelcomeMailer};
pub use senha::{PasswordScorer, PasswordStrength};
pub use store::{StoreError, UserStore};
pub use usuario::{NovoUsuario, Usuario, UsuarioUpdate};
pub use validate::{validate_email, validate_nome, validate_senha};
