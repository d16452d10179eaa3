// handlers/protected/users.rs - user account endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::user_service;
use crate::state::AppState;
use crate::types::UpdateUserRequest;

/// GET /users
pub async fn users_get(State(state): State<AppState>) -> ApiResult<Value> {
    let users = state.users.list().await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /user/read/:userId
pub async fn user_get(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Value> {
    let user = user_service::find(&state, parse_id(&user_id)?).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PUT /user/update/:userId
pub async fn user_put(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiResponse<Value>, ApiError> {
    let id = parse_id(&user_id)?;
    let Json(request) = payload?;
    let user = user_service::update(&state, &actor, id, request).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// DELETE /user/delete/:userId
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Value> {
    user_service::delete(&state, &actor, parse_id(&user_id)?).await?;
    Ok(ApiResponse::success(json!({})))
}
