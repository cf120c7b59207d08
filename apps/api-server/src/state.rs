//! Application state.

use std::sync::Arc;

use user_store::UserStore;

use crate::config::Config;
use crate::services::UserService;

/// Shared application state.
pub struct AppState<S: UserStore> {
    /// Server configuration.
    pub config: Config,
    /// User record service.
    pub users: UserService<S>,
}

impl<S: UserStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            users: UserService::new(store),
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config and store.
pub fn create_shared_state<S: UserStore>(config: Config, store: S) -> SharedState<S> {
    Arc::new(AppState::new(config, store))
}
