use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::{CurrentUser, NOT_LOGGED_IN};
use crate::auth::Role;
use crate::database::models::User;
use crate::error::ApiError;

pub const NOT_PERMITTED: &str = "You are not permitted to access this module";

/// Admit `user` only when its role is exactly `required`.
pub fn check_role(user: &User, required: Role) -> Result<(), ApiError> {
    if user.role == required {
        Ok(())
    } else {
        tracing::warn!(
            "User {} with role {} denied, {} required",
            user.id,
            user.role,
            required
        );
        Err(ApiError::forbidden(NOT_PERMITTED))
    }
}

/// Route layer running after [`super::resolve_principal`].
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let CurrentUser(user) = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthorized(NOT_LOGGED_IN))?;
    check_role(user, required)?;
    Ok(next.run(request).await)
}
