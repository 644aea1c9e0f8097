use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// One row of the `usuarios` table.
///
/// `id` is assigned by the store on insert and never changes afterwards.
/// `email` is unique across all rows; the store enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub altura: Option<f64>,
    pub peso: Option<f64>,
}

/// Validated input for creating a `Usuario`.
///
/// Construction via [`UsuarioDraft::new`] guarantees `nome` and `email` are
/// present and non-empty, so a draft that exists is safe to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioDraft {
    pub nome: String,
    pub email: String,
    pub altura: Option<f64>,
    pub peso: Option<f64>,
}

impl UsuarioDraft {
    /// Validate raw input into a draft. Absent or empty `nome`/`email` is
    /// rejected here, before any store interaction.
    pub fn new(
        nome: Option<String>,
        email: Option<String>,
        altura: Option<f64>,
        peso: Option<f64>,
    ) -> DomainResult<Self> {
        let nome = nome
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::validation("nome is required"))?;
        let email = email
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::validation("email is required"))?;

        Ok(Self {
            nome,
            email,
            altura,
            peso,
        })
    }
}

/// Full-replacement input for updating a `Usuario`.
///
/// Not validated: all four mutable columns are written as supplied, and an
/// absent field becomes NULL at the store (where column constraints apply).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsuarioUpdate {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub altura: Option<f64>,
    pub peso: Option<f64>,
}
