pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{connect, migrate};
pub use memory::MemoryStore;
pub use repository::PgStore;
pub use store::{Bounded, CatalogStore, StoreError, UserStore};
