// handlers/protected/mod.rs - Protected handlers (principal required)
//
// Security Level: valid access token for an existing user
// Middleware: resolve_principal

pub mod auth; // session: /me, /user/logout
pub mod catalog; // level and group reads
pub mod users; // user accounts

pub use auth::*;
pub use catalog::*;
pub use users::*;
