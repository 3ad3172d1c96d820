use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /usuarios`. Fields optional so the handler can answer the
/// missing-field case with the contract message instead of a 422.
#[derive(Debug, Deserialize)]
pub struct CreateUsuarioRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
}

/// Body of `PUT /usuarios/:id` — validated field-wise.
#[derive(Debug, Deserialize)]
pub struct UpdateUsuarioRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
}
