//! Fixtures shared by unit tests: signing keys, a ready token service and an
//! application state over the in-memory store.

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{PasswordHasher, Role, SigningAlgorithm, TokenKeys, TokenService};
use crate::config::{AppConfig, KeyPairConfig, KeyPem};
use crate::database::models::{NewUser, User};
use crate::database::{MemoryStore, UserStore};
use crate::state::AppState;

pub const ACCESS_PRIVATE: &str = include_str!("../../fixtures/keys/access_ed25519.pem");
pub const ACCESS_PUBLIC: &str = include_str!("../../fixtures/keys/access_ed25519.pub.pem");
pub const REFRESH_PRIVATE: &str = include_str!("../../fixtures/keys/refresh_ed25519.pem");
pub const REFRESH_PUBLIC: &str = include_str!("../../fixtures/keys/refresh_ed25519.pub.pem");
pub const FOREIGN_PRIVATE: &str = include_str!("../../fixtures/keys/foreign_ed25519.pem");
pub const FOREIGN_PUBLIC: &str = include_str!("../../fixtures/keys/foreign_ed25519.pub.pem");
pub const ACCESS_RSA_PRIVATE: &str = include_str!("../../fixtures/keys/access_rsa.pem");
pub const ACCESS_RSA_PUBLIC: &str = include_str!("../../fixtures/keys/access_rsa.pub.pem");

/// Low bcrypt cost keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

fn ed_keys(private: &str, public: &str) -> TokenKeys {
    TokenKeys::from_pem(SigningAlgorithm::EdDsa, private.as_bytes(), public.as_bytes())
        .expect("fixture keys are valid")
}

pub fn access_keys() -> TokenKeys {
    ed_keys(ACCESS_PRIVATE, ACCESS_PUBLIC)
}

pub fn refresh_keys() -> TokenKeys {
    ed_keys(REFRESH_PRIVATE, REFRESH_PUBLIC)
}

pub fn foreign_keys() -> TokenKeys {
    ed_keys(FOREIGN_PRIVATE, FOREIGN_PUBLIC)
}

pub fn token_service() -> TokenService {
    TokenService::new(
        access_keys(),
        refresh_keys(),
        Duration::minutes(15),
        Duration::minutes(60),
    )
}

fn pair(private: &str, public: &str) -> KeyPairConfig {
    KeyPairConfig {
        private_key: KeyPem(private.to_string()),
        public_key: KeyPem(public.to_string()),
    }
}

/// Development defaults with the Ed25519 fixture keys.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development().with_keys(
        SigningAlgorithm::EdDsa,
        pair(ACCESS_PRIVATE, ACCESS_PUBLIC),
        pair(REFRESH_PRIVATE, REFRESH_PUBLIC),
    );
    config.auth.bcrypt_cost = TEST_BCRYPT_COST;
    config
}

/// State over a fresh in-memory store, plus a handle to that store for seeding.
pub fn test_state_with(config: AppConfig) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone(), store.clone())
        .expect("test config is valid");
    (state, store)
}

pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    test_state_with(test_config())
}

/// Insert a user with a real password hash.
pub async fn seed_user(store: &MemoryStore, email: &str, password: &str, role: Role) -> User {
    let hash = PasswordHasher::new(TEST_BCRYPT_COST)
        .hash(password)
        .expect("hashing succeeds");
    UserStore::insert(
        store,
        NewUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hash,
            role,
            level: None,
            group: None,
        },
    )
    .await
    .expect("seed user is unique")
}
