// handlers/elevated/mod.rs - Elevated handlers (privileged role required)
//
// Security Level: valid access token and Role::PRIVILEGED
// Middleware: resolve_principal + require_role

pub mod catalog;

pub use catalog::*;
