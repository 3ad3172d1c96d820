//! In-memory user store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use guarita_auth::{DirectoryError, UserDirectory, UsuarioRegistro};
use guarita_core::UserId;
use guarita_usuarios::{NovoUsuario, StoreError, UserStore, Usuario, UsuarioUpdate};

/// In-memory user store.
///
/// Intended for tests/dev. The at-rest password field holds the raw senha;
/// a persistent implementation owns real hashing.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    usuarios: RwLock<HashMap<UserId, Usuario>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record (test/seed helper).
    pub fn insert(&self, usuario: Usuario) {
        self.usuarios
            .write()
            .expect("user store lock poisoned")
            .insert(usuario.id, usuario);
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<UserId, Usuario>>, StoreError> {
        self.usuarios
            .read()
            .map_err(|_| StoreError("lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_all(&self) -> Result<Vec<Usuario>, StoreError> {
        let usuarios = self.read()?;
        let mut all: Vec<Usuario> = usuarios.values().cloned().collect();
        all.sort_by_key(|u| *u.id.as_uuid());
        Ok(all)
    }

    async fn find_one(&self, id: UserId) -> Result<Option<Usuario>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, StoreError> {
        let wanted = email.to_lowercase();
        Ok(self
            .read()?
            .values()
            .find(|u| u.email == wanted)
            .cloned())
    }

    async fn create(&self, novo: NovoUsuario) -> Result<Usuario, StoreError> {
        let usuario = Usuario {
            id: UserId::new(),
            nome: novo.nome,
            email: novo.email,
            senha_hash: novo.senha,
            is_active: true,
        };

        self.usuarios
            .write()
            .map_err(|_| StoreError("lock poisoned".to_string()))?
            .insert(usuario.id, usuario.clone());

        Ok(usuario)
    }

    async fn update(
        &self,
        id: UserId,
        update: UsuarioUpdate,
    ) -> Result<Option<Usuario>, StoreError> {
        let mut usuarios = self
            .usuarios
            .write()
            .map_err(|_| StoreError("lock poisoned".to_string()))?;

        let Some(usuario) = usuarios.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(nome) = update.nome {
            usuario.nome = nome;
        }
        if let Some(email) = update.email {
            usuario.email = email;
        }
        if let Some(senha) = update.senha {
            usuario.senha_hash = senha;
        }
        if let Some(is_active) = update.is_active {
            usuario.is_active = is_active;
        }

        Ok(Some(usuario.clone()))
    }

    async fn remove(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self
            .usuarios
            .write()
            .map_err(|_| StoreError("lock poisoned".to_string()))?
            .remove(&id)
            .is_some())
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UsuarioRegistro>, DirectoryError> {
        let usuarios = self
            .usuarios
            .read()
            .map_err(|_| DirectoryError("lock poisoned".to_string()))?;

        Ok(usuarios.get(&id).map(|u| UsuarioRegistro {
            id: u.id,
            nome: u.nome.clone(),
            email: u.email.clone(),
            is_active: u.is_active,
        }))
    }
}
