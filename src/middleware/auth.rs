use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{TokenError, ACCESS_TOKEN_COOKIE};
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

pub const NOT_LOGGED_IN: &str = "You are not logged in";
pub const USER_GONE: &str = "The user belonging to this token no longer exists";

/// Largest request body inspected for an `access_token` field.
const BODY_TOKEN_LIMIT: usize = 64 * 1024;

/// Authenticated principal, attached to request extensions by [`resolve_principal`]
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Resolves the caller from an access token and attaches it as [`CurrentUser`].
///
/// The token is taken from the `Authorization: Bearer` header, then the
/// `access_token` cookie, then (only when enabled) an `access_token` field of
/// a JSON body.
pub async fn resolve_principal(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let mut request = request;
    let mut token = token_from_headers(request.headers(), &jar);

    if token.is_none() && state.config.auth.accept_body_token {
        let (parts, body) = request.into_parts();
        let bytes = body::to_bytes(body, BODY_TOKEN_LIMIT)
            .await
            .map_err(|_| ApiError::bad_request("Request body is too large"))?;
        token = token_from_body(&bytes);
        request = Request::from_parts(parts, Body::from(bytes));
    }

    let Some(token) = token else {
        tracing::warn!("Rejected {}: no access token", request.uri().path());
        return Err(ApiError::unauthorized(NOT_LOGGED_IN));
    };

    let user = principal_for_token(&state, &token).await?;
    tracing::debug!("Resolved principal {} for {}", user.id, request.uri().path());

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Validate an access token and load the user it names.
pub async fn principal_for_token(state: &AppState, token: &str) -> Result<User, ApiError> {
    let subject = state.tokens.validate_access(token).map_err(|e| {
        tracing::warn!("Rejected access token: {}", e);
        ApiError::from(e)
    })?;

    let id = Uuid::parse_str(&subject).map_err(|_| {
        tracing::warn!("Access token subject '{}' is not a user id", subject);
        ApiError::from(TokenError::Malformed)
    })?;

    match state.users.find_by_id(id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("Access token names unknown user {}", id);
            Err(ApiError::unauthorized(USER_GONE))
        }
    }
}

/// Bearer header first, then the access token cookie. Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn token_from_body(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    value
        .get(ACCESS_TOKEN_COOKIE)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
