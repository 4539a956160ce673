//! Outcome type for the auth core

use crate::repositories::StoreError;
use myflix_shared::AuthFailure;
use thiserror::Error;

/// Error returned by `CredentialVerifier` and `TokenAuthority`.
///
/// `Rejected` is a business outcome the caller maps to 401. The other
/// variants are infrastructure faults and map to 500.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication rejected: {0}")]
    Rejected(#[from] AuthFailure),

    #[error("User store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// The classified rejection, if this is one
    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthError::Rejected(failure) => Some(*failure),
            _ => None,
        }
    }
}
