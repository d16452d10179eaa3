pub mod password;
pub mod role;
pub mod token;

pub use password::{PasswordError, PasswordHasher};
pub use role::Role;
pub use token::{Claims, SigningAlgorithm, TokenError, TokenKeys, TokenService};

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
/// Non-httponly flag readable by browser code
pub const LOGGED_IN_COOKIE: &str = "logged_in";
