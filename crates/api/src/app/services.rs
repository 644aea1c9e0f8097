use std::sync::Arc;

use cadastro_infra::UsuarioStore;

/// Services injected into handlers at startup.
///
/// The store is an explicitly passed dependency (never a module-level
/// singleton) so tests can substitute the in-memory double for Postgres.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn UsuarioStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn UsuarioStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn UsuarioStore {
        self.store.as_ref()
    }
}
