use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::auth::USER_GONE;
use crate::services::validation;
use crate::state::AppState;
use crate::types::{LoginRequest, RegisterRequest};

pub const EMAIL_NOT_REGISTERED: &str = "Email is not registered";
pub const INVALID_PASSWORD: &str = "Invalid password";
pub const REFRESH_FAILED: &str = "Could not refresh access token";

/// Tokens minted by a successful login
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Create a member account. Public registration never grants a privileged role.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<User, ApiError> {
    let name = validation::required("name", &request.name)?;
    let email = validation::email(&request.email)?;
    validation::new_password(&request.password, &request.password_confirm)?;

    let password_hash = state.hasher.hash(&request.password)?;
    let user = state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash,
            role: Role::Member,
            level: request.level,
            group: request.group,
        })
        .await?;

    tracing::info!("Registered user {}", user.id);
    Ok(user)
}

/// Check credentials and mint an access and a refresh token.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<Session, ApiError> {
    let email = validation::required("email", &request.email)?;
    if request.password.is_empty() {
        return Err(ApiError::invalid_field("password", "is required"));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::warn!("Login for unregistered email");
        return Err(ApiError::unauthorized(EMAIL_NOT_REGISTERED));
    };

    if !state.hasher.verify(&request.password, &user.password_hash) {
        tracing::warn!("Login for user {} with wrong password", user.id);
        return Err(ApiError::unauthorized(INVALID_PASSWORD));
    }

    let subject = user.id.to_string();
    let access_token = state.tokens.issue_access(&subject)?;
    let refresh_token = state.tokens.issue_refresh(&subject)?;

    tracing::info!("User {} logged in", user.id);
    Ok(Session {
        user,
        access_token,
        refresh_token,
    })
}

/// Mint a new access token from a refresh token.
///
/// Every rejection is a 403; only a store outage surfaces differently.
pub async fn refresh(state: &AppState, refresh_token: Option<&str>) -> Result<(User, String), ApiError> {
    let token = refresh_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::forbidden(REFRESH_FAILED))?;

    let subject = state.tokens.validate_refresh(token).map_err(|e| {
        tracing::warn!("Rejected refresh token: {}", e);
        ApiError::forbidden(e.to_string())
    })?;

    let id = Uuid::parse_str(&subject).map_err(|_| ApiError::forbidden(REFRESH_FAILED))?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::forbidden(USER_GONE))?;

    let access_token = state.tokens.issue_access(&user.id.to_string())?;
    tracing::debug!("Refreshed access token for {}", user.id);
    Ok((user, access_token))
}
