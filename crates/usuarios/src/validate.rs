//! Field validation for user records.
//!
//! The messages are user-visible, stable strings; validation order matters
//! because clients rely on the most specific diagnostic being returned.

use guarita_core::DomainError;

/// Validate a display name: 2–100 characters, letters (accented included),
/// spaces, apostrophes and hyphens; not digits-only; no double spaces.
pub fn validate_nome(nome: &str) -> Result<(), DomainError> {
    let nome = nome.trim();

    if nome.chars().count() < 2 {
        return Err(DomainError::validation(
            "Nome deve ter pelo menos 2 caracteres.",
        ));
    }

    if nome.chars().count() > 100 {
        return Err(DomainError::validation(
            "Nome deve ter no máximo 100 caracteres.",
        ));
    }

    if nome.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(
            "Nome não pode ser composto apenas por números.",
        ));
    }

    if nome.contains("  ") {
        return Err(DomainError::validation(
            "Nome não pode ter espaços consecutivos.",
        ));
    }

    if !nome
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(DomainError::validation("Nome contém caracteres inválidos."));
    }

    Ok(())
}

/// Validate an e-mail address, returning the most specific diagnostic the
/// input deserves before falling back to the generic shape error.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(DomainError::validation("O email não pode ser vazio."));
    }

    if !email.contains('@') {
        return Err(DomainError::validation(
            "O email deve conter o símbolo '@'.",
        ));
    }

    if email.matches('@').count() > 1 {
        return Err(DomainError::validation(
            "O email deve conter apenas um símbolo '@'.",
        ));
    }

    if email.contains(' ') {
        return Err(DomainError::validation("O email não pode conter espaços."));
    }

    if email.starts_with('@') || email.ends_with('@') {
        return Err(DomainError::validation(
            "O email não pode começar ou terminar com '@'.",
        ));
    }

    if !email.contains('.') {
        return Err(DomainError::validation(
            "O email deve conter um ponto (.) no domínio.",
        ));
    }

    if !well_formed(email) {
        return Err(DomainError::validation(
            "Formato de email inválido (ex: usuario@dominio.com).",
        ));
    }

    Ok(())
}

/// Validate a raw password: presence only. Strength is scored by the
/// external `PasswordScorer` collaborator, not here.
pub fn validate_senha(senha: &str) -> Result<(), DomainError> {
    if senha.trim().is_empty() {
        return Err(DomainError::validation(
            "Senha é obrigatória e não pode ser vazia.",
        ));
    }
    Ok(())
}

/// Shape check equivalent to `local@domain.tld` with ASCII locals, dotted
/// domains and a 2–6 letter TLD.
fn well_formed(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return false;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    {
        return false;
    }

    let tld = labels[labels.len() - 1];
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}
