// handlers/protected/auth/mod.rs - session handlers for authenticated users

pub mod session;

pub use session::{logout_get, me_get};
