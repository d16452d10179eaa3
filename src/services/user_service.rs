use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::{NewUser, User, UserChanges};
use crate::error::ApiError;
use crate::middleware::role::NOT_PERMITTED;
use crate::services::validation;
use crate::state::AppState;
use crate::types::UpdateUserRequest;

pub const USER_NOT_FOUND: &str = "User not found";

fn ensure_self_or_privileged(actor: &User, target: Uuid) -> Result<(), ApiError> {
    if actor.id == target || actor.role.is_privileged() {
        Ok(())
    } else {
        tracing::warn!("User {} may not modify user {}", actor.id, target);
        Err(ApiError::forbidden(NOT_PERMITTED))
    }
}

pub async fn find(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

/// Apply a profile update on behalf of `actor`.
///
/// Users may edit themselves; administrators may edit anyone and are the only
/// ones allowed to change a role.
pub async fn update(
    state: &AppState,
    actor: &User,
    id: Uuid,
    request: UpdateUserRequest,
) -> Result<User, ApiError> {
    ensure_self_or_privileged(actor, id)?;

    let mut changes = UserChanges {
        name: Some(validation::required("name", &request.name)?),
        email: Some(validation::email(&request.email)?),
        level: request.level,
        group: request.group,
        ..Default::default()
    };

    if let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) {
        validation::new_password(password, request.password_confirm.as_deref().unwrap_or(""))?;
        changes.password_hash = Some(state.hasher.hash(password)?);
    }

    if let Some(role) = request.role {
        let current = find(state, id).await?;
        if role != current.role {
            if !actor.role.is_privileged() {
                tracing::warn!("User {} tried to change the role of {}", actor.id, id);
                return Err(ApiError::forbidden(NOT_PERMITTED));
            }
            changes.role = Some(role);
        }
    }

    let user = state
        .users
        .update_fields(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    tracing::info!("User {} updated by {}", user.id, actor.id);
    Ok(user)
}

pub async fn delete(state: &AppState, actor: &User, id: Uuid) -> Result<(), ApiError> {
    ensure_self_or_privileged(actor, id)?;

    if !state.users.delete(id).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }
    tracing::info!("User {} deleted by {}", id, actor.id);
    Ok(())
}

/// Create the administrator account, or promote the existing account with
/// that email. Running it twice changes nothing.
pub async fn ensure_administrator(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
    let email = validation::email(email)?;

    if let Some(existing) = state.users.find_by_email(&email).await? {
        if existing.role == Role::PRIVILEGED {
            return Ok(existing);
        }
        let changes = UserChanges {
            role: Some(Role::PRIVILEGED),
            ..Default::default()
        };
        let promoted = state
            .users
            .update_fields(existing.id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
        tracing::info!("Promoted {} to {}", promoted.email, Role::PRIVILEGED);
        return Ok(promoted);
    }

    validation::new_password(password, password)?;
    let user = state
        .users
        .insert(NewUser {
            name: "Administrator".to_string(),
            email,
            password_hash: state.hasher.hash(password)?,
            role: Role::PRIVILEGED,
            level: None,
            group: None,
        })
        .await?;
    tracing::info!("Created administrator {}", user.email);
    Ok(user)
}
