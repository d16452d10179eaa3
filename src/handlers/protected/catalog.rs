// handlers/protected/catalog.rs - level and group reads

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::CatalogKind;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

async fn list(state: &AppState, kind: CatalogKind) -> ApiResult<Value> {
    let entries = state.catalog.list(kind).await?;
    Ok(ApiResponse::success(json!({ kind.plural_key(): entries })))
}

async fn read(state: &AppState, kind: CatalogKind, raw_id: &str) -> ApiResult<Value> {
    let entry = state
        .catalog
        .find(kind, parse_id(raw_id)?)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", kind.label())))?;
    Ok(ApiResponse::success(json!({ kind.key(): entry })))
}

/// GET /levels
pub async fn levels_get(State(state): State<AppState>) -> ApiResult<Value> {
    list(&state, CatalogKind::Level).await
}

/// GET /level/read/:levelId
pub async fn level_get(State(state): State<AppState>, Path(level_id): Path<String>) -> ApiResult<Value> {
    read(&state, CatalogKind::Level, &level_id).await
}

/// GET /groups
pub async fn groups_get(State(state): State<AppState>) -> ApiResult<Value> {
    list(&state, CatalogKind::Group).await
}

/// GET /group/read/:groupId
pub async fn group_get(State(state): State<AppState>, Path(group_id): Path<String>) -> ApiResult<Value> {
    read(&state, CatalogKind::Group, &group_id).await
}
