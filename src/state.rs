use std::sync::Arc;
use std::time::Duration;

use crate::auth::{PasswordHasher, TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::{Bounded, CatalogStore, UserStore};

/// Shared, read-only handles every request works with
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Build state from configuration. Both stores are bounded by the
    /// configured store timeout.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Result<Self, TokenError> {
        let tokens = TokenService::from_config(&config.auth)?;
        let limit = Duration::from_millis(config.database.store_timeout_ms);

        Ok(Self {
            hasher: PasswordHasher::new(config.auth.bcrypt_cost),
            tokens: Arc::new(tokens),
            users: Arc::new(Bounded::new(users, limit)),
            catalog: Arc::new(Bounded::new(catalog, limit)),
            config: Arc::new(config),
        })
    }
}
