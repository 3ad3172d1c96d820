//! In-memory RBAC graph store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use guarita_auth::{Modulo, Perfil, Permissao, PolicyError, PolicyStore, Role};
use guarita_core::{Action, ModuloId, PerfilId, PermissaoId, RoleId, UserId};

#[derive(Debug, Default)]
struct PolicyData {
    modulos: HashMap<ModuloId, Modulo>,
    permissoes: HashMap<PermissaoId, Permissao>,
    roles: HashMap<RoleId, Role>,
    perfis: HashMap<PerfilId, Perfil>,
    /// user → active profile. One entry per user, by construction.
    assignments: HashMap<UserId, PerfilId>,
}

/// In-memory policy store.
///
/// Intended for tests/dev. The seeding methods mirror what the external
/// CRUD collaborators would do against a persistent store.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    data: RwLock<PolicyData>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_modulo(&self, nome: impl Into<String>) -> Modulo {
        let modulo = Modulo {
            id: ModuloId::new(),
            nome: nome.into(),
        };
        self.write().modulos.insert(modulo.id, modulo.clone());
        modulo
    }

    pub fn add_permissao(&self, modulo_id: ModuloId, action: Action) -> Permissao {
        let permissao = Permissao {
            id: PermissaoId::new(),
            modulo_id,
            action,
        };
        self.write().permissoes.insert(permissao.id, permissao.clone());
        permissao
    }

    pub fn add_role(&self, nome: impl Into<String>, permissao_ids: Vec<PermissaoId>) -> Role {
        let role = Role {
            id: RoleId::new(),
            nome: nome.into(),
            permissao_ids,
        };
        self.write().roles.insert(role.id, role.clone());
        role
    }

    pub fn add_perfil(&self, nome: impl Into<String>, role_ids: Vec<RoleId>) -> Perfil {
        let perfil = Perfil {
            id: PerfilId::new(),
            nome: nome.into(),
            role_ids,
        };
        self.write().perfis.insert(perfil.id, perfil.clone());
        perfil
    }

    /// Assign `perfil` as the user's active profile, replacing any previous
    /// assignment (a user never holds two profiles at once).
    pub fn assign_perfil(&self, user: UserId, perfil: PerfilId) {
        self.write().assignments.insert(user, perfil);
    }

    pub fn remove_role(&self, id: RoleId) {
        self.write().roles.remove(&id);
    }

    pub fn remove_permissao(&self, id: PermissaoId) {
        self.write().permissoes.remove(&id);
    }

    pub fn remove_modulo(&self, id: ModuloId) {
        self.write().modulos.remove(&id);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, PolicyData> {
        self.data.write().expect("policy store lock poisoned")
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, PolicyData>, PolicyError> {
        self.data
            .read()
            .map_err(|_| PolicyError("lock poisoned".to_string()))
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn perfil_of(&self, user: UserId) -> Result<Option<Perfil>, PolicyError> {
        let data = self.read()?;
        Ok(data
            .assignments
            .get(&user)
            .and_then(|perfil_id| data.perfis.get(perfil_id))
            .cloned())
    }

    async fn role(&self, id: RoleId) -> Result<Option<Role>, PolicyError> {
        Ok(self.read()?.roles.get(&id).cloned())
    }

    async fn permissao(&self, id: PermissaoId) -> Result<Option<Permissao>, PolicyError> {
        Ok(self.read()?.permissoes.get(&id).cloned())
    }

    async fn modulo(&self, id: ModuloId) -> Result<Option<Modulo>, PolicyError> {
        Ok(self.read()?.modulos.get(&id).cloned())
    }
}

/// Seed a profile granting `actions` on module `modulo`, assigned to `user`.
///
/// Convenience for wiring/dev/tests; one role, one profile.
pub fn seed_profile(
    store: &MemoryPolicyStore,
    user: UserId,
    modulo: &str,
    actions: &[Action],
) -> Perfil {
    let modulo = store.add_modulo(modulo);
    let permissao_ids = actions
        .iter()
        .map(|a| store.add_permissao(modulo.id, *a).id)
        .collect();
    let role = store.add_role(format!("{}-role", modulo.nome), permissao_ids);
    let perfil = store.add_perfil(format!("{}-perfil", modulo.nome), vec![role.id]);
    store.assign_perfil(user, perfil.id);
    perfil
}
