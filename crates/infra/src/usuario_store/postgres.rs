//! Postgres-backed store for the `usuarios` table.
//!
//! All statements are parameterized and single-shot; there are no
//! multi-statement transactions. The unique constraint on `email` is enforced
//! by the database, and its violation (PostgreSQL error code `23505`) is the
//! only database error the handler layer treats specially.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Code | StoreError | Scenario |
//! |------------|-----------------|------------|----------|
//! | Database (unique violation) | `23505` | `DuplicateEmail` | Email already present |
//! | Database (other) | any other | `Database` | Constraint/type failures etc. |
//! | PoolClosed / Io / other | n/a | `Unavailable` | Store unreachable |
//!
//! ## Thread Safety
//!
//! `PgUsuarioStore` is `Send + Sync`; the SQLx pool multiplexes concurrent
//! in-flight statements without mixing their results.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use cadastro_core::{Usuario, UsuarioDraft, UsuarioUpdate};

use super::{StoreError, StoreResult, UsuarioStore};

/// Postgres adapter over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgUsuarioStore {
    pool: Arc<PgPool>,
}

impl PgUsuarioStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Startup connection test: round-trip a trivial query and return the
    /// server clock as text. A failure here means the store is unreachable.
    #[instrument(skip(self), err)]
    pub async fn ping(&self) -> StoreResult<String> {
        let row = sqlx::query("SELECT now()::text AS server_time")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;

        row.try_get("server_time")
            .map_err(|e| StoreError::database("ping", e.to_string()))
    }
}

#[async_trait]
impl UsuarioStore for PgUsuarioStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> StoreResult<Vec<Usuario>> {
        let rows = sqlx::query(
            r#"
            SELECT id, nome, email, altura, peso
            FROM usuarios
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        let mut usuarios = Vec::with_capacity(rows.len());
        for row in rows {
            let usuario = UsuarioRow::from_row(&row)
                .map_err(|e| StoreError::database("list", e.to_string()))?;
            usuarios.push(usuario.into());
        }
        Ok(usuarios)
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: i32) -> StoreResult<Option<Usuario>> {
        let row = sqlx::query(
            r#"
            SELECT id, nome, email, altura, peso
            FROM usuarios
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        match row {
            Some(row) => {
                let usuario = UsuarioRow::from_row(&row)
                    .map_err(|e| StoreError::database("get", e.to_string()))?;
                Ok(Some(usuario.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, draft), fields(email = %draft.email), err)]
    async fn insert(&self, draft: UsuarioDraft) -> StoreResult<Usuario> {
        let row = sqlx::query(
            r#"
            INSERT INTO usuarios (nome, email, altura, peso)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nome, email, altura, peso
            "#,
        )
        .bind(&draft.nome)
        .bind(&draft.email)
        .bind(draft.altura)
        .bind(draft.peso)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        let usuario = UsuarioRow::from_row(&row)
            .map_err(|e| StoreError::database("insert", e.to_string()))?;
        Ok(usuario.into())
    }

    #[instrument(skip(self, update), err)]
    async fn update(&self, id: i32, update: UsuarioUpdate) -> StoreResult<Option<Usuario>> {
        let row = sqlx::query(
            r#"
            UPDATE usuarios
            SET nome = $1, email = $2, altura = $3, peso = $4
            WHERE id = $5
            RETURNING id, nome, email, altura, peso
            "#,
        )
        .bind(&update.nome)
        .bind(&update.email)
        .bind(update.altura)
        .bind(update.peso)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        match row {
            Some(row) => {
                let usuario = UsuarioRow::from_row(&row)
                    .map_err(|e| StoreError::database("update", e.to_string()))?;
                Ok(Some(usuario.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if is_unique_violation_code(db_err.code().as_deref()) {
                StoreError::DuplicateEmail
            } else {
                StoreError::database(operation, db_err.message())
            }
        }
        sqlx::Error::PoolClosed => StoreError::unavailable(operation, "connection pool closed"),
        sqlx::Error::PoolTimedOut => {
            StoreError::unavailable(operation, "timed out waiting for a connection")
        }
        other => StoreError::database(operation, other.to_string()),
    }
}

/// PostgreSQL error code `23505`: unique constraint violation.
fn is_unique_violation_code(code: Option<&str>) -> bool {
    code == Some("23505")
}

// SQLx row type

#[derive(Debug)]
struct UsuarioRow {
    id: i32,
    nome: String,
    email: String,
    altura: Option<f64>,
    peso: Option<f64>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UsuarioRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UsuarioRow {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            altura: row.try_get("altura")?,
            peso: row.try_get("peso")?,
        })
    }
}

impl From<UsuarioRow> for Usuario {
    fn from(row: UsuarioRow) -> Self {
        Usuario {
            id: row.id,
            nome: row.nome,
            email: row.email,
            altura: row.altura,
            peso: row.peso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_is_code_23505() {
        assert!(is_unique_violation_code(Some("23505")));
        assert!(!is_unique_violation_code(Some("23503")));
        assert!(!is_unique_violation_code(Some("23514")));
        assert!(!is_unique_violation_code(None));
    }

    #[test]
    fn non_database_errors_map_to_store_faults() {
        let err = map_sqlx_error("list", sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Unavailable { .. }));

        let err = map_sqlx_error("get", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database { .. }));
    }
}
