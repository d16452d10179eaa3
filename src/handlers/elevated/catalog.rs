// handlers/elevated/catalog.rs - level and group management
//
// Every route here sits behind the role gate.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::CatalogKind;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::validation;
use crate::state::AppState;
use crate::types::CatalogRequest;

fn not_found(kind: CatalogKind) -> ApiError {
    ApiError::not_found(format!("{} not found", kind.label()))
}

async fn create(
    state: &AppState,
    kind: CatalogKind,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;
    let input = validation::catalog_input(request)?;
    let entry = state.catalog.insert(kind, input).await?;
    tracing::info!("Created {} {}", kind.key(), entry.id);
    Ok(ApiResponse::created(json!({ kind.key(): entry })))
}

async fn update(
    state: &AppState,
    kind: CatalogKind,
    raw_id: &str,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_id(raw_id)?;
    let Json(request) = payload?;
    let input = validation::catalog_input(request)?;
    let entry = state
        .catalog
        .update(kind, id, input)
        .await?
        .ok_or_else(|| not_found(kind))?;
    Ok(ApiResponse::success(json!({ kind.key(): entry })))
}

async fn delete(state: &AppState, kind: CatalogKind, raw_id: &str) -> ApiResult<Value> {
    let id = parse_id(raw_id)?;
    if !state.catalog.delete(kind, id).await? {
        return Err(not_found(kind));
    }
    tracing::info!("Deleted {} {}", kind.key(), id);
    Ok(ApiResponse::success(json!({})))
}

/// POST /level/create
pub async fn level_post(
    State(state): State<AppState>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    create(&state, CatalogKind::Level, payload).await
}

/// PUT /level/update/:levelId
pub async fn level_put(
    State(state): State<AppState>,
    Path(level_id): Path<String>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    update(&state, CatalogKind::Level, &level_id, payload).await
}

/// DELETE /level/delete/:levelId
pub async fn level_delete(State(state): State<AppState>, Path(level_id): Path<String>) -> ApiResult<Value> {
    delete(&state, CatalogKind::Level, &level_id).await
}

/// POST /group/create
pub async fn group_post(
    State(state): State<AppState>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    create(&state, CatalogKind::Group, payload).await
}

/// PUT /group/update/:groupId
pub async fn group_put(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    update(&state, CatalogKind::Group, &group_id, payload).await
}

/// DELETE /group/delete/:groupId
pub async fn group_delete(State(state): State<AppState>, Path(group_id): Path<String>) -> ApiResult<Value> {
    delete(&state, CatalogKind::Group, &group_id).await
}
