//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ===== User DTOs =====

/// Role as exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    #[default]
    User,
    Admin,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    #[schema(example = "deadpool")]
    pub username: String,
    #[schema(example = "deadpool@example.com")]
    pub email: String,
    /// Avatar URL
    pub avatar: Option<String>,
    pub role: RoleDto,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "deadpool")]
    pub username: String,
    #[schema(example = "deadpool@example.com")]
    pub email: String,
    /// 4 to 128 characters
    pub password: String,
    #[serde(default)]
    pub role: RoleDto,
}

/// OAuth2 password-flow form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Request a new confirmation email
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequestEmail {
    pub email: String,
}

/// Request a password change for an account
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
    /// New password, 4 to 128 characters
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Multipart body for avatar upload
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AvatarUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

// ===== Contact DTOs =====

/// Contact create/update body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactRequest {
    #[schema(example = "Bob")]
    pub first_name: String,
    #[schema(example = "Smith")]
    pub last_name: String,
    #[schema(example = "bob.smith@example.com")]
    pub email: String,
    #[schema(example = "123-456-7890")]
    pub phone_number: String,
    /// Date of birth (YYYY-MM-DD)
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub info: Option<String>,
}

/// Contact response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birth_date: Option<NaiveDate>,
    pub info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Substring filters and pagination for listing contacts
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContactsQuery {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthdaysQuery {
    /// Look-ahead window in days, at least 1
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

// Note: Conversion implementations live in mapper.rs
