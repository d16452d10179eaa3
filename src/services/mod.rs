pub mod auth_service;
pub mod user_service;
pub mod validation;

pub use auth_service::Session;
