pub mod auth;
pub mod response;
pub mod role;

pub use auth::{principal_for_token, resolve_principal, CurrentUser};
pub use response::{ApiResponse, ApiResult};
pub use role::{check_role, require_role};
