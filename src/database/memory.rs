use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    normalize_email, CatalogEntry, CatalogInput, CatalogKind, NewUser, User, UserChanges,
};
use super::store::{CatalogStore, StoreError, UserStore};

/// Process-local store used by tests and `--store memory`
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    catalogs: RwLock<HashMap<CatalogKind, HashMap<Uuid, CatalogEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.email.cmp(&b.email)));
        Ok(all)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = User::from_new(user, Uuid::new_v4(), Utc::now());

        // Check and insert under one write lock so concurrent registrations can not both win.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} is already registered", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_fields(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;

        if let Some(email) = changes.email.as_deref() {
            let email = normalize_email(email);
            if users.values().any(|u| u.id != id && u.email == email) {
                return Err(StoreError::Conflict(format!("email {} is already registered", email)));
            }
        }

        Ok(users.get_mut(&id).map(|user| {
            user.apply(changes, Utc::now());
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, StoreError> {
        let catalogs = self.catalogs.read().await;
        let mut entries: Vec<CatalogEntry> = catalogs
            .get(&kind)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn find(&self, kind: CatalogKind, id: Uuid) -> Result<Option<CatalogEntry>, StoreError> {
        let catalogs = self.catalogs.read().await;
        Ok(catalogs.get(&kind).and_then(|entries| entries.get(&id)).cloned())
    }

    async fn insert(&self, kind: CatalogKind, input: CatalogInput) -> Result<CatalogEntry, StoreError> {
        let entry = CatalogEntry {
            id: Uuid::new_v4(),
            name: input.name,
            acronym: input.acronym,
        };
        self.catalogs
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: CatalogInput,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        let mut catalogs = self.catalogs.write().await;
        Ok(catalogs
            .get_mut(&kind)
            .and_then(|entries| entries.get_mut(&id))
            .map(|entry| {
                entry.name = input.name;
                entry.acronym = input.acronym;
                entry.clone()
            }))
    }

    async fn delete(&self, kind: CatalogKind, id: Uuid) -> Result<bool, StoreError> {
        let mut catalogs = self.catalogs.write().await;
        Ok(catalogs
            .get_mut(&kind)
            .map(|entries| entries.remove(&id).is_some())
            .unwrap_or(false))
    }
}
