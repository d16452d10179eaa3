// handlers/public/auth/login.rs - POST /user/auth handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::cookies;
use crate::middleware::ApiResponse;
use crate::services::auth_service;
use crate::state::AppState;
use crate::types::LoginRequest;

/**
 * POST /user/auth - Authenticate with email and password
 *
 * Expected Input:
 * ```json
 * { "email": "jane@example.com", "password": "secret123" }
 * ```
 *
 * On success the access token is returned in the body and the
 * `access_token`, `refresh_token` and `logged_in` cookies are set.
 * Unknown email and wrong password are both 401 with distinct messages.
 */
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let Json(request) = payload?;
    let session = auth_service::login(&state, request).await?;

    let auth = &state.config.auth;
    let jar = cookies::with_access_token(jar, &state.config.cookie, session.access_token.clone(), auth.access_token_max_age);
    let jar = cookies::with_refresh_token(jar, &state.config.cookie, session.refresh_token, auth.refresh_token_max_age);

    Ok((
        jar,
        ApiResponse::success(json!({
            "access_token": session.access_token,
            "user": session.user,
        })),
    ))
}
