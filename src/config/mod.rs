use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

use crate::auth::token::SigningAlgorithm;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid key material in {0}: {1}")]
    InvalidKey(&'static str, String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cookie: CookieConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds allowed for acquiring a pooled connection.
    pub connection_timeout: u64,
    /// Upper bound on any single store call, in milliseconds.
    pub store_timeout_ms: u64,
}

/// PEM encoded key. Never printed.
#[derive(Clone, Default)]
pub struct KeyPem(pub String);

impl fmt::Debug for KeyPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("KeyPem(<unset>)")
        } else {
            f.write_str("KeyPem(<redacted>)")
        }
    }
}

impl KeyPem {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyPairConfig {
    pub private_key: KeyPem,
    pub public_key: KeyPem,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub algorithm: SigningAlgorithm,
    pub access: KeyPairConfig,
    pub refresh: KeyPairConfig,
    /// Token lifetimes in minutes.
    pub access_token_expires_in: i64,
    pub refresh_token_expires_in: i64,
    /// Cookie max-age in minutes.
    pub access_token_max_age: i64,
    pub refresh_token_max_age: i64,
    /// Accept `access_token` inside a JSON request body when neither header nor cookie is present.
    pub accept_body_token: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    pub domain: String,
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// `APP_ENV` picks the preset, individual variables override it, and the
    /// four signing keys must be present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("SERVER_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = env::var("API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("STORE_TIMEOUT_MS") {
            self.database.store_timeout_ms = v.parse().unwrap_or(self.database.store_timeout_ms);
        }

        // Token overrides
        if let Ok(v) = env::var("TOKEN_ALGORITHM") {
            self.auth.algorithm = v
                .parse()
                .map_err(|e: String| ConfigError::InvalidValue("TOKEN_ALGORITHM", e))?;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_PRIVATE_KEY") {
            self.auth.access.private_key = decode_pem("ACCESS_TOKEN_PRIVATE_KEY", &v)?;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_PUBLIC_KEY") {
            self.auth.access.public_key = decode_pem("ACCESS_TOKEN_PUBLIC_KEY", &v)?;
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_PRIVATE_KEY") {
            self.auth.refresh.private_key = decode_pem("REFRESH_TOKEN_PRIVATE_KEY", &v)?;
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_PUBLIC_KEY") {
            self.auth.refresh.public_key = decode_pem("REFRESH_TOKEN_PUBLIC_KEY", &v)?;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRES_IN") {
            self.auth.access_token_expires_in =
                parse_minutes(&v).unwrap_or(self.auth.access_token_expires_in);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_EXPIRES_IN") {
            self.auth.refresh_token_expires_in =
                parse_minutes(&v).unwrap_or(self.auth.refresh_token_expires_in);
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_MAXAGE") {
            self.auth.access_token_max_age = v.parse().unwrap_or(self.auth.access_token_max_age);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_MAXAGE") {
            self.auth.refresh_token_max_age = v.parse().unwrap_or(self.auth.refresh_token_max_age);
        }
        if let Ok(v) = env::var("ACCEPT_BODY_TOKEN") {
            self.auth.accept_body_token = v.parse().unwrap_or(self.auth.accept_body_token);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.auth.bcrypt_cost = v.parse().unwrap_or(self.auth.bcrypt_cost);
        }

        // Cookie overrides
        if let Ok(v) = env::var("COOKIE_DOMAIN") {
            self.cookie.domain = v;
        }
        if let Ok(v) = env::var("COOKIE_SECURE") {
            self.cookie.secure = v.parse().unwrap_or(self.cookie.secure);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        Ok(self)
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            ("ACCESS_TOKEN_PRIVATE_KEY", &self.auth.access.private_key),
            ("ACCESS_TOKEN_PUBLIC_KEY", &self.auth.access.public_key),
            ("REFRESH_TOKEN_PRIVATE_KEY", &self.auth.refresh.private_key),
            ("REFRESH_TOKEN_PUBLIC_KEY", &self.auth.refresh.public_key),
        ];
        for (name, key) in keys {
            if key.is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }

        if self.auth.access_token_expires_in <= 0 {
            return Err(ConfigError::InvalidValue(
                "ACCESS_TOKEN_EXPIRES_IN",
                "must be positive".to_string(),
            ));
        }
        if self.auth.refresh_token_expires_in <= 0 {
            return Err(ConfigError::InvalidValue(
                "REFRESH_TOKEN_EXPIRES_IN",
                "must be positive".to_string(),
            ));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(
                "BCRYPT_COST",
                format!("{} is outside 4..=31", self.auth.bcrypt_cost),
            ));
        }

        Ok(())
    }

    /// Replace both signing keypairs.
    pub fn with_keys(
        mut self,
        algorithm: SigningAlgorithm,
        access: KeyPairConfig,
        refresh: KeyPairConfig,
    ) -> Self {
        self.auth.algorithm = algorithm;
        self.auth.access = access;
        self.auth.refresh = refresh;
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 1224,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                store_timeout_ms: 5_000,
            },
            auth: AuthConfig {
                algorithm: SigningAlgorithm::Rs256,
                access: KeyPairConfig::default(),
                refresh: KeyPairConfig::default(),
                access_token_expires_in: 15,
                refresh_token_expires_in: 60,
                access_token_max_age: 15,
                refresh_token_max_age: 60,
                accept_body_token: false,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            cookie: CookieConfig {
                domain: "localhost".to_string(),
                secure: false,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:1224".to_string(),
                    "http://localhost:3000".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.bind = "0.0.0.0".to_string();
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.database.store_timeout_ms = 5_000;
        config.cookie.secure = true;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.bind = "0.0.0.0".to_string();
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.database.store_timeout_ms = 3_000;
        config.auth.access_token_expires_in = 10;
        config.auth.access_token_max_age = 10;
        config.cookie.secure = true;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config
    }
}

/// Accept raw PEM or base64-encoded PEM.
fn decode_pem(name: &'static str, value: &str) -> Result<KeyPem, ConfigError> {
    let value = value.trim();
    if value.contains("-----BEGIN") {
        // Env files often carry PEM with literal "\n" sequences.
        return Ok(KeyPem(value.replace("\\n", "\n")));
    }

    let bytes = STANDARD
        .decode(value)
        .map_err(|e| ConfigError::InvalidKey(name, e.to_string()))?;
    let pem = String::from_utf8(bytes).map_err(|e| ConfigError::InvalidKey(name, e.to_string()))?;
    if !pem.contains("-----BEGIN") {
        return Err(ConfigError::InvalidKey(name, "decoded value is not PEM".to_string()));
    }
    Ok(KeyPem(pem))
}

/// Minutes as a bare number or with a unit suffix: `15`, `15m`, `2h`, `1d`.
fn parse_minutes(value: &str) -> Option<i64> {
    let value = value.trim();
    let (number, factor) = match value.chars().last()? {
        'm' => (&value[..value.len() - 1], 1),
        'h' => (&value[..value.len() - 1], 60),
        'd' => (&value[..value.len() - 1], 60 * 24),
        _ => (value, 1),
    };
    number.trim().parse::<i64>().ok().map(|n| n * factor)
}
