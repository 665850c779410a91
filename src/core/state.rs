// Application state (AppState)

use crate::core::config::{Config, Environment};
use crate::services::registration::RegistrationService;
use crate::stores::user_store::UserStore;
use std::sync::Arc;

/// Shared application state
///
/// Handed to every request handler; owns the user store through the registration service.
#[derive(Clone)]
pub struct AppState {
    /// Registration service over the injected user store
    pub registry: RegistrationService,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: UserStore) -> Self {
        Self {
            registry: RegistrationService::new(Arc::new(store)),
            config: Arc::new(config),
        }
    }

    pub fn environment(&self) -> Environment {
        self.config.server.environment
    }
}
