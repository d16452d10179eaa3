// handlers/public/auth/register.rs - POST /user/create handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::auth_service;
use crate::state::AppState;
use crate::types::RegisterRequest;

/**
 * POST /user/create - Register a new account
 *
 * Expected Input:
 * ```json
 * {
 *   "name": "Jane",
 *   "email": "jane@example.com",
 *   "password": "secret123",
 *   "passwordConfirm": "secret123",
 *   "level": "optional level id",
 *   "group": "optional group id"
 * }
 * ```
 *
 * New accounts are always members. Duplicate emails are a 409.
 */
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<Value>, ApiError> {
    let Json(request) = payload?;
    let user = auth_service::register(&state, request).await?;
    Ok(ApiResponse::created(json!({ "user": user })))
}
