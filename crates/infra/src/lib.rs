//! Infrastructure layer: the store behind the Usuarios API.

pub mod usuario_store;

pub use usuario_store::{
    InMemoryUsuarioStore, PgUsuarioStore, StoreError, StoreResult, UsuarioStore,
};
