use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    normalize_email, CatalogEntry, CatalogInput, CatalogKind, NewUser, User, UserChanges, UserRow,
};
use super::store::{CatalogStore, StoreError, UserStore};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, level_id, group_id, created_at, updated_at";

/// Postgres-backed implementation of both store traits
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode(row: UserRow) -> Result<User, StoreError> {
    User::try_from(row).map_err(StoreError::Decode)
}

/// Unique violations become `Conflict`, everything else passes through.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(decode).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        row.map(decode).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, email", USER_COLUMNS);
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(decode).collect()
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, level_id, group_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(normalize_email(&user.email))
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.level)
            .bind(&user.group)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        decode(row)
    }

    async fn update_fields(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET \
               name = COALESCE($2, name), \
               email = COALESCE($3, email), \
               password_hash = COALESCE($4, password_hash), \
               role = COALESCE($5, role), \
               level_id = COALESCE($6, level_id), \
               group_id = COALESCE($7, group_id), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email.as_deref().map(normalize_email))
            .bind(changes.password_hash)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(changes.level)
            .bind(changes.group)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.map(decode).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, StoreError> {
        let sql = format!("SELECT id, name, acronym FROM {} ORDER BY name", kind.table());
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find(&self, kind: CatalogKind, id: Uuid) -> Result<Option<CatalogEntry>, StoreError> {
        let sql = format!("SELECT id, name, acronym FROM {} WHERE id = $1", kind.table());
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, kind: CatalogKind, input: CatalogInput) -> Result<CatalogEntry, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, name, acronym) VALUES ($1, $2, $3) RETURNING id, name, acronym",
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.acronym)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: CatalogInput,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $2, acronym = $3 WHERE id = $1 RETURNING id, name, acronym",
            kind.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.acronym)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete(&self, kind: CatalogKind, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
