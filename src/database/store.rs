use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{CatalogEntry, CatalogInput, CatalogKind, NewUser, User, UserChanges};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for user accounts.
///
/// Lookups that find nothing return `Ok(None)`; errors are reserved for the
/// store itself failing.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn update_fields(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Persistence for levels and groups
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, StoreError>;

    async fn find(&self, kind: CatalogKind, id: Uuid) -> Result<Option<CatalogEntry>, StoreError>;

    async fn insert(&self, kind: CatalogKind, input: CatalogInput) -> Result<CatalogEntry, StoreError>;

    async fn update(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: CatalogInput,
    ) -> Result<Option<CatalogEntry>, StoreError>;

    async fn delete(&self, kind: CatalogKind, id: Uuid) -> Result<bool, StoreError>;
}

/// Wraps a store so every call finishes within `limit` or fails with `Timeout`.
pub struct Bounded<S: ?Sized> {
    inner: Arc<S>,
    limit: Duration,
}

impl<S: ?Sized> Bounded<S> {
    pub fn new(inner: Arc<S>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn run<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Store call exceeded {:?}", self.limit);
                Err(StoreError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl<S: UserStore + ?Sized> UserStore for Bounded<S> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.run(self.inner.find_by_id(id)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.run(self.inner.find_by_email(email)).await
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.run(UserStore::list(&*self.inner)).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.run(UserStore::insert(&*self.inner, user)).await
    }

    async fn update_fields(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        self.run(self.inner.update_fields(id, changes)).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.run(UserStore::delete(&*self.inner, id)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.run(self.inner.ping()).await
    }
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for Bounded<S> {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, StoreError> {
        self.run(CatalogStore::list(&*self.inner, kind)).await
    }

    async fn find(&self, kind: CatalogKind, id: Uuid) -> Result<Option<CatalogEntry>, StoreError> {
        self.run(self.inner.find(kind, id)).await
    }

    async fn insert(&self, kind: CatalogKind, input: CatalogInput) -> Result<CatalogEntry, StoreError> {
        self.run(CatalogStore::insert(&*self.inner, kind, input)).await
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: CatalogInput,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        self.run(self.inner.update(kind, id, input)).await
    }

    async fn delete(&self, kind: CatalogKind, id: Uuid) -> Result<bool, StoreError> {
        self.run(CatalogStore::delete(&*self.inner, kind, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    struct SlowStore;

    #[async_trait]
    impl UserStore for SlowStore {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn list(&self) -> Result<Vec<User>, StoreError> {
            Ok(vec![])
        }

        async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
            Err(StoreError::Conflict("unused".to_string()))
        }

        async fn update_fields(&self, _id: Uuid, _changes: UserChanges) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let store = Bounded::new(Arc::new(SlowStore), Duration::from_millis(20));
        let result = store.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn fast_lookup_passes_through() {
        let store = Bounded::new(Arc::new(SlowStore), Duration::from_millis(20));
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bounded_works_over_trait_objects() {
        let inner: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let store = Bounded::new(inner, Duration::from_secs(1));
        let entry = store
            .insert(
                CatalogKind::Level,
                CatalogInput {
                    name: "Administrator".to_string(),
                    acronym: "ADM".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.find(CatalogKind::Level, entry.id).await.unwrap(), Some(entry));
    }
}
