//! Baseline password-strength scoring adapter.

use guarita_usuarios::{PasswordScorer, PasswordStrength};

/// Character-class based scorer.
///
/// Stand-in for the real scoring collaborator: under 8 characters is weak;
/// 8+ with at least three character classes is strong; anything else medium.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicPasswordScorer;

impl PasswordScorer for BasicPasswordScorer {
    fn strength(&self, senha: &str) -> PasswordStrength {
        if senha.chars().count() < 8 {
            return PasswordStrength::Weak;
        }

        let classes = [
            senha.chars().any(|c| c.is_ascii_lowercase()),
            senha.chars().any(|c| c.is_ascii_uppercase()),
            senha.chars().any(|c| c.is_ascii_digit()),
            senha.chars().any(|c| !c.is_ascii_alphanumeric()),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if classes >= 3 {
            PasswordStrength::Strong
        } else {
            PasswordStrength::Medium
        }
    }
}
