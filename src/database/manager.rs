use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::store::StoreError;
use crate::config::DatabaseConfig;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS user_levels (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        acronym TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS user_groups (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        acronym TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'member',
        level_id TEXT,
        group_id TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

/// Open the connection pool described by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url = config
        .url
        .as_deref()
        .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    info!("Connected to database (max {} connections)", config.max_connections);
    Ok(pool)
}

/// Create the tables this service needs when they are missing.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is up to date");
    Ok(())
}
