//! Store boundary for the `usuarios` table.
//!
//! This module defines an infrastructure-facing abstraction over the
//! relational store without making storage assumptions, so handlers can run
//! against PostgreSQL in production and an in-memory double in tests.

use async_trait::async_trait;
use thiserror::Error;

use cadastro_core::{Usuario, UsuarioDraft, UsuarioUpdate};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUsuarioStore;
pub use postgres::PgUsuarioStore;

/// Result type used across the store layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
///
/// `DuplicateEmail` is the one failure the handler layer distinguishes (it
/// maps to 409); everything else is an internal fault reported generically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The unique constraint on `email` was violated. The write had no effect.
    #[error("email already registered")]
    DuplicateEmail,

    /// The store rejected or failed the statement for any other reason.
    #[error("database error in {operation}: {message}")]
    Database { operation: String, message: String },

    /// The store could not be reached (pool closed, connection failure).
    #[error("store unavailable in {operation}: {message}")]
    Unavailable { operation: String, message: String },
}

impl StoreError {
    pub fn database(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Database {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Persistence operations for `Usuario` rows.
///
/// Each method issues a single independent statement; there is no
/// multi-statement coordination, so implementations only need to keep one
/// statement's result from bleeding into another's under concurrency.
#[async_trait]
pub trait UsuarioStore: Send + Sync {
    /// Fetch all rows ordered by `id` ascending. The ordering is a
    /// correctness requirement, not cosmetic.
    async fn list(&self) -> StoreResult<Vec<Usuario>>;

    /// Fetch the row matching `id`, if any.
    async fn get(&self, id: i32) -> StoreResult<Option<Usuario>>;

    /// Insert a new row and return it with the store-assigned `id`.
    async fn insert(&self, draft: UsuarioDraft) -> StoreResult<Usuario>;

    /// Replace the mutable columns of the row matching `id` and return the
    /// updated row, or `None` if no row matched.
    async fn update(&self, id: i32, update: UsuarioUpdate) -> StoreResult<Option<Usuario>>;

    /// Delete the row matching `id`. Returns whether a row was deleted.
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}
