use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Role;

/// Stored user account, also the authenticated principal of a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub level: Option<String>,
    pub group: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub level: Option<String>,
    pub group: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub level: Option<String>,
    pub group: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.level.is_none()
            && self.group.is_none()
    }
}

impl User {
    pub fn from_new(new: NewUser, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: normalize_email(&new.email),
            password_hash: new.password_hash,
            role: new.role,
            level: new.level,
            group: new.group,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = normalize_email(&email);
        }
        if let Some(hash) = changes.password_hash {
            self.password_hash = hash;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(level) = changes.level {
            self.level = Some(level);
        }
        if let Some(group) = changes.group {
            self.group = Some(group);
        }
        self.updated_at = now;
    }
}

/// Row shape of the `users` table
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub level_id: Option<String>,
    pub group_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            level: row.level_id,
            group: row.group_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Emails are stored and compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
