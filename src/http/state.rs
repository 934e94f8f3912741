use crate::journal::DreamStore;
use crate::session::SessionController;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Dream journal
    pub store: DreamStore,

    /// The single recording session
    pub session: SessionController,
}

impl AppState {
    pub fn new(store: DreamStore, session: SessionController) -> Self {
        Self { store, session }
    }
}
