//! In-memory store for the `usuarios` table.
//!
//! Intended for tests/dev. Mirrors the constraints the database enforces:
//! ascending store-assigned ids, unique `email`, and NOT NULL `nome`/`email`
//! on full-replacement updates.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use cadastro_core::{Usuario, UsuarioDraft, UsuarioUpdate};

use super::{StoreError, StoreResult, UsuarioStore};

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<i32, Usuario>,
    next_id: i32,
}

/// In-memory `UsuarioStore` test double.
#[derive(Debug, Default)]
pub struct InMemoryUsuarioStore {
    state: RwLock<State>,
}

impl InMemoryUsuarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(state: &State, email: &str, excluding: Option<i32>) -> bool {
        state
            .rows
            .values()
            .any(|u| u.email == email && Some(u.id) != excluding)
    }
}

#[async_trait]
impl UsuarioStore for InMemoryUsuarioStore {
    async fn list(&self) -> StoreResult<Vec<Usuario>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("list", "lock poisoned"))?;

        // BTreeMap iteration is already id-ascending.
        Ok(state.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Usuario>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("get", "lock poisoned"))?;

        Ok(state.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: UsuarioDraft) -> StoreResult<Usuario> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::unavailable("insert", "lock poisoned"))?;

        if Self::email_taken(&state, &draft.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        state.next_id += 1;
        let usuario = Usuario {
            id: state.next_id,
            nome: draft.nome,
            email: draft.email,
            altura: draft.altura,
            peso: draft.peso,
        };
        state.rows.insert(usuario.id, usuario.clone());
        Ok(usuario)
    }

    async fn update(&self, id: i32, update: UsuarioUpdate) -> StoreResult<Option<Usuario>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::unavailable("update", "lock poisoned"))?;

        if !state.rows.contains_key(&id) {
            return Ok(None);
        }

        // Full replacement: an absent required column is a constraint
        // violation, exactly as NOT NULL would fail in the database.
        let nome = update.nome.ok_or_else(|| {
            StoreError::database("update", "null value in column \"nome\" violates not-null constraint")
        })?;
        let email = update.email.ok_or_else(|| {
            StoreError::database("update", "null value in column \"email\" violates not-null constraint")
        })?;

        if Self::email_taken(&state, &email, Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }

        let usuario = Usuario {
            id,
            nome,
            email,
            altura: update.altura,
            peso: update.peso,
        };
        state.rows.insert(id, usuario.clone());
        Ok(Some(usuario))
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::unavailable("delete", "lock poisoned"))?;

        Ok(state.rows.remove(&id).is_some())
    }
}
