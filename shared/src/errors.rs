//! Error types shared between the backend and its clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an authentication attempt was rejected.
///
/// The variants are distinguishable for logging and diagnostics only. The HTTP
/// layer maps every credential failure to one response and every token failure
/// to another, so a client can never tell which check failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    #[error("User not found")]
    UserNotFound,

    #[error("Password mismatch")]
    PasswordMismatch,

    #[error("Token malformed")]
    TokenMalformed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature invalid")]
    TokenSignatureInvalid,

    /// The token is authentic and unexpired but its subject no longer exists.
    #[error("Principal not found")]
    PrincipalNotFound,
}

impl AuthFailure {
    /// True for failures raised while checking a username/password pair.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthFailure::UserNotFound | AuthFailure::PasswordMismatch)
    }

    /// True for failures raised while validating a bearer token.
    pub fn is_token_failure(&self) -> bool {
        !self.is_credential_failure()
    }

    /// Stable label used for metrics and structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFailure::UserNotFound => "user_not_found",
            AuthFailure::PasswordMismatch => "password_mismatch",
            AuthFailure::TokenMalformed => "token_malformed",
            AuthFailure::TokenExpired => "token_expired",
            AuthFailure::TokenSignatureInvalid => "token_signature_invalid",
            AuthFailure::PrincipalNotFound => "principal_not_found",
        }
    }
}
