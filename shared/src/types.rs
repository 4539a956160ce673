//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Login request
///
/// Field names follow the catalog's historical `Username`/`Password` form
/// fields; lowercase names are accepted as well.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "Username")]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(alias = "Password")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration request
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(alias = "Username")]
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
    #[serde(alias = "Password")]
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
    #[serde(alias = "Email")]
    #[validate(email(message = "Email does not appear to be valid"))]
    pub email: String,
    #[serde(default, alias = "Birthday")]
    pub birthday: Option<NaiveDate>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("birthday", &self.birthday)
            .finish()
    }
}

/// The authenticated identity as exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: String,
    pub username: String,
}

/// Login response: the authenticated user plus a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: PrincipalView,
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
