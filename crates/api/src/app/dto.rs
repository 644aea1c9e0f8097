use serde::Deserialize;

use cadastro_core::{DomainResult, UsuarioDraft, UsuarioUpdate};

// -------------------------
// Request DTOs
// -------------------------

/// Body accepted by `POST /usuarios` and `PUT /usuarios/:id`.
///
/// All fields are optional at the wire level; what is required depends on the
/// operation (create validates, update is a raw full replacement).
#[derive(Debug, Deserialize)]
pub struct UsuarioBody {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub altura: Option<f64>,
    pub peso: Option<f64>,
}

impl UsuarioBody {
    /// Validate into a create input. Fails if `nome` or `email` is absent or
    /// empty.
    pub fn into_draft(self) -> DomainResult<UsuarioDraft> {
        UsuarioDraft::new(self.nome, self.email, self.altura, self.peso)
    }

    /// Pass through as a full-replacement update input, unvalidated.
    pub fn into_update(self) -> UsuarioUpdate {
        UsuarioUpdate {
            nome: self.nome,
            email: self.email,
            altura: self.altura,
            peso: self.peso,
        }
    }
}
