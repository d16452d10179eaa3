pub mod catalog;
pub mod user;

pub use catalog::{CatalogEntry, CatalogInput, CatalogKind};
pub use user::{normalize_email, NewUser, User, UserChanges, UserRow};
