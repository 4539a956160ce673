//! Username/password verification

use super::{AuthError, PasswordService, Principal};
use crate::repositories::UserStore;
use myflix_shared::AuthFailure;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Checks submitted credentials against the user store.
///
/// Cheap to clone; holds the store handle and a lazily computed decoy hash.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    decoy_hash: Arc<OnceCell<String>>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Resolve a principal from a username/password pair.
    ///
    /// Fails with `UserNotFound` or `PasswordMismatch`; callers must not expose
    /// which one to the client. Neither half of the credentials is logged.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let Some(user) = self.store.find_by_username(username).await? else {
            // Unknown users cost one hash verification, same as known ones
            self.burn_decoy(password).await;
            debug!(reason = AuthFailure::UserNotFound.as_str(), "credentials rejected");
            return Err(AuthFailure::UserNotFound.into());
        };

        if !user.verify_password(password).await? {
            debug!(reason = AuthFailure::PasswordMismatch.as_str(), "credentials rejected");
            return Err(AuthFailure::PasswordMismatch.into());
        }

        Ok(Principal::from(&user))
    }

    async fn burn_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| PasswordService::hash_async("decoy-password".to_string()))
            .await;

        match decoy {
            Ok(hash) => {
                let _ = PasswordService::verify_async(password.to_string(), hash.clone()).await;
            }
            Err(e) => debug!("decoy hash unavailable: {}", e),
        }
    }
}
