use serde::{Deserialize, Serialize};

use guarita_core::UserId;

/// A user record.
///
/// The e-mail is stored lowercase and is unique case-insensitively; the
/// at-rest password representation belongs to the store and never leaves
/// the process through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: UserId,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub senha_hash: String,
    pub is_active: bool,
}

/// Input for creating a user. Fields are expected to be validated and
/// normalized (trimmed, lowercased e-mail) before reaching the store.
#[derive(Debug, Clone)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

/// Field-wise update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsuarioUpdate {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
    pub is_active: Option<bool>,
}

impl UsuarioUpdate {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.email.is_none()
            && self.senha.is_none()
            && self.is_active.is_none()
    }
}
