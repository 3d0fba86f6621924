use std::sync::Arc;

use crate::config::AppConfig;
use crate::session::SessionManager;
use crate::store::StoreAdapter;

/// Shared application state threaded through every handler.
pub struct AppState<S: StoreAdapter> {
    pub config: Arc<AppConfig>,
    pub store: Arc<S>,
    pub sessions: Arc<SessionManager<S>>,
}

impl<S: StoreAdapter> AppState<S> {
    pub fn new(config: AppConfig, store: S) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(store);
        let sessions = Arc::new(SessionManager::new(store.clone(), config.clone()));
        Self {
            config,
            store,
            sessions,
        }
    }
}

// Manual impl: `S` need not be Clone, only the Arcs are cloned.
impl<S: StoreAdapter> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: self.store.clone(),
            sessions: self.sessions.clone(),
        }
    }
}
