//! Effective-permission resolution over the RBAC graph.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use guarita_core::{Action, UserId};

use crate::policy::{PolicyError, PolicyStore};

/// A resolved (module, action) grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grant {
    pub modulo: String,
    pub action: Action,
}

/// Answers "may user X perform action A on module M?".
///
/// The effective set is recomputed from current data on every call — there
/// is no cache, so role/profile/permission mutations are visible on the
/// next check without an invalidation protocol.
pub struct PermissionGraph {
    store: Arc<dyn PolicyStore>,
}

impl PermissionGraph {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Union of the permissions reachable through every role in the user's
    /// profile. No profile means an empty set.
    ///
    /// Dangling role/permission/module references are skipped: absence is
    /// "not granted", never an error.
    pub async fn effective_permissions(
        &self,
        user: UserId,
    ) -> Result<HashSet<Grant>, PolicyError> {
        let mut grants = HashSet::new();

        let Some(perfil) = self.store.perfil_of(user).await? else {
            return Ok(grants);
        };

        for role_id in &perfil.role_ids {
            let Some(role) = self.store.role(*role_id).await? else {
                continue;
            };

            for permissao_id in &role.permissao_ids {
                let Some(permissao) = self.store.permissao(*permissao_id).await? else {
                    continue;
                };
                let Some(modulo) = self.store.modulo(permissao.modulo_id).await? else {
                    continue;
                };

                grants.insert(Grant {
                    modulo: modulo.nome,
                    action: permissao.action,
                });
            }
        }

        Ok(grants)
    }

    /// Deny-by-default membership test: allowed iff the exact
    /// (module, action) pair appears in the effective set.
    pub async fn is_allowed(
        &self,
        user: UserId,
        modulo: &str,
        action: Action,
    ) -> Result<bool, PolicyError> {
        let grants = self.effective_permissions(user).await?;
        Ok(grants.contains(&Grant {
            modulo: modulo.to_string(),
            action,
        }))
    }
}
