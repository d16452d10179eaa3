use crate::database::models::{normalize_email, CatalogInput};
use crate::error::ApiError;
use crate::types::CatalogRequest;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trimmed value of a required text field.
pub fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::invalid_field(field, "is required"));
    }
    Ok(value.to_string())
}

/// Normalized email, or a validation error when it does not look like an address.
pub fn email(value: &str) -> Result<String, ApiError> {
    let email = normalize_email(&required("email", value)?);

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::invalid_field("email", "is not a valid email address"));
    }
    Ok(email)
}

pub fn new_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::invalid_field(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if password != confirm {
        return Err(ApiError::invalid_field("passwordConfirm", "passwords do not match"));
    }
    Ok(())
}

pub fn catalog_input(request: CatalogRequest) -> Result<CatalogInput, ApiError> {
    Ok(CatalogInput {
        name: required("name", &request.name)?,
        acronym: required("acronym", &request.acronym)?,
    })
}
