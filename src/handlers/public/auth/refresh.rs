// handlers/public/auth/refresh.rs - POST /user/refresh handler

use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::REFRESH_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::handlers::cookies;
use crate::middleware::ApiResponse;
use crate::services::auth_service;
use crate::state::AppState;

/// Reads only the `refresh_token` cookie; any rejection is a 403.
pub async fn refresh_post(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let presented = jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string());
    let (_user, access_token) = auth_service::refresh(&state, presented.as_deref()).await?;

    let jar = cookies::with_access_token(
        jar,
        &state.config.cookie,
        access_token.clone(),
        state.config.auth.access_token_max_age,
    );

    Ok((jar, ApiResponse::success(json!({ "access_token": access_token }))))
}
