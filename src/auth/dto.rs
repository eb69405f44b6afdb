use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, repo_types::User};

/// Header carrying the JWT on authenticated requests.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Request body for signup. Absent fields deserialize as empty and are
/// rejected by `validate`; values are stored exactly as sent.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignupRequest {
    pub const MISSING_FIELDS: &'static str = "All fields are required";

    pub fn validate(self) -> Result<Self, AuthError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(Self::MISSING_FIELDS.into()));
        }
        Ok(self)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub const MISSING_FIELDS: &'static str = "Email and password required";

    pub fn validate(self) -> Result<Self, AuthError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(Self::MISSING_FIELDS.into()));
        }
        Ok(self)
    }
}

/// `{ token, ...user }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}

/// `{ ...user, token }`
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}
