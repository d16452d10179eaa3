/// Request payloads shared by handlers and services

use serde::Deserialize;

use crate::auth::Role;

/// POST /user/create
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
    pub level: Option<String>,
    pub group: Option<String>,
}

/// POST /user/auth
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// PUT /user/update/:userId
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: Option<String>,
    pub role: Option<Role>,
    pub level: Option<String>,
    pub group: Option<String>,
}

/// Create and update body for levels and groups
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogRequest {
    pub name: String,
    pub acronym: String,
}
