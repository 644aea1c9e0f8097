//! `cadastro-core` — domain types for the Usuarios registry.
//!
//! This crate contains **pure domain** types (no HTTP, no database concerns).

pub mod error;
pub mod usuario;

pub use error::{DomainError, DomainResult};
pub use usuario::{Usuario, UsuarioDraft, UsuarioUpdate};
