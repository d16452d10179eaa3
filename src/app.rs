use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::Role;
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_role, resolve_principal, ApiResponse};
use crate::state::AppState;

/// The complete HTTP application.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Principal required
        .merge(protected_routes(state.clone()))
        // Principal + privileged role
        .merge(elevated_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create", post(public::register_post))
        .route("/user/auth", post(public::login_post))
        .route("/user/refresh", post(public::refresh_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(protected::me_get))
        .route("/user/logout", get(protected::logout_get))
        .route("/users", get(protected::users_get))
        .route("/user/read/:userId", get(protected::user_get))
        .route("/user/update/:userId", put(protected::user_put))
        .route("/user/delete/:userId", delete(protected::user_delete))
        .route("/levels", get(protected::levels_get))
        .route("/level/read/:levelId", get(protected::level_get))
        .route("/groups", get(protected::groups_get))
        .route("/group/read/:groupId", get(protected::group_get))
        .route_layer(from_fn_with_state(state, resolve_principal))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    // Layers run bottom-up: the principal is resolved before the role is checked.
    Router::new()
        .route("/level/create", post(elevated::level_post))
        .route("/level/update/:levelId", put(elevated::level_put))
        .route("/level/delete/:levelId", delete(elevated::level_delete))
        .route("/group/create", post(elevated::group_post))
        .route("/group/update/:groupId", put(elevated::group_put))
        .route("/group/delete/:groupId", delete(elevated::group_delete))
        .route_layer(from_fn_with_state(Role::PRIVILEGED, require_role))
        .route_layer(from_fn_with_state(state, resolve_principal))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "public": "/user/create, /user/auth, /user/refresh, /health",
            "users": "/users, /me, /user/read|update|delete/:userId, /user/logout (logged in)",
            "levels": "/levels, /level/read/:levelId (logged in); /level/create|update|delete (administrator)",
            "groups": "/groups, /group/read/:groupId (logged in); /group/create|update|delete (administrator)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}
