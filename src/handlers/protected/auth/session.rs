// handlers/protected/auth/session.rs - current session endpoints

use axum::{extract::State, Extension};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::handlers::cookies;
use crate::middleware::{ApiResponse, CurrentUser};
use crate::state::AppState;

/// GET /me - the resolved principal
pub async fn me_get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    ApiResponse::success(json!({ "user": user }))
}

/// GET /user/logout - clear the session cookies
///
/// Tokens are stateless, so an access token copied elsewhere stays valid
/// until it expires.
pub async fn logout_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> (CookieJar, ApiResponse<Value>) {
    tracing::info!("User {} logged out", user.id);
    (cookies::cleared(jar, &state.config.cookie), ApiResponse::success(json!({})))
}
