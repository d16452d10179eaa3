// handlers/public/auth/mod.rs - Public authentication handlers
//
// Registration and token acquisition. None of these require a token.

pub mod login;    // POST /user/auth - check credentials, set session cookies
pub mod refresh;  // POST /user/refresh - new access token from the refresh cookie
pub mod register; // POST /user/create - create a member account

pub use login::login_post;
pub use refresh::refresh_post;
pub use register::register_post;
