//! User service: login, registration and the current user's profile
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{AuthError, CredentialVerifier, PasswordService, Principal, TokenAuthority};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserStore};
use myflix_shared::types::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use myflix_shared::validation::{first_violation, validate_not_blank, ValidationError};
use myflix_shared::AuthFailure;
use tracing::{info, warn};
use validator::Validate;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Exchange credentials for a bearer token
    pub async fn login(
        verifier: &CredentialVerifier,
        tokens: &TokenAuthority,
        req: &LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        validate(req)?;

        let principal = match verifier.verify(&req.username, &req.password).await {
            Ok(principal) => principal,
            Err(AuthError::Rejected(failure)) => {
                record_login(failure.as_str());
                info!(reason = failure.as_str(), "Login rejected");
                return Err(ApiError::Auth(failure));
            }
            Err(e) => {
                record_login("error");
                return Err(e.into());
            }
        };

        // Signing faults surface as 500
        let token = tokens.issue(&principal).map_err(ApiError::Internal)?;
        record_login("success");
        info!(user_id = %principal.id(), "Login succeeded");

        Ok(LoginResponse {
            user: principal.to_view(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.validity_secs(),
        })
    }

    /// Register a new user
    pub async fn register(store: &dyn UserStore, req: &RegisterRequest) -> Result<UserProfile, ApiError> {
        validate(req)?;
        validate_not_blank("username", &req.username).map_err(ApiError::Validation)?;

        if store.find_by_username(&req.username).await?.is_some() {
            return Err(ApiError::Conflict(format!("{} already exists", req.username)));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let user = store
            .create(NewUser {
                username: req.username.clone(),
                password_hash,
                email: req.email.clone(),
                birthday: req.birthday,
            })
            .await?;

        info!(user_id = %user.id, "User registered");

        Ok(UserProfile {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            birthday: user.birthday,
            created_at: user.created_at,
        })
    }

    /// Profile of the authenticated principal
    pub async fn get_profile(store: &dyn UserStore, principal: &Principal) -> Result<UserProfile, ApiError> {
        let user = store
            .find_by_id(principal.id())
            .await?
            .ok_or(ApiError::Auth(AuthFailure::PrincipalNotFound))?;

        Ok(UserProfile {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            birthday: user.birthday,
            created_at: user.created_at,
        })
    }

    /// Delete the authenticated principal's account.
    ///
    /// Tokens already issued stay cryptographically valid but resolve to
    /// `PrincipalNotFound` from now on.
    pub async fn deregister(store: &dyn UserStore, principal: &Principal) -> Result<(), ApiError> {
        if !store.delete(principal.id()).await? {
            warn!(user_id = %principal.id(), "Deregistration raced with another delete");
            return Err(ApiError::Auth(AuthFailure::PrincipalNotFound));
        }

        info!(user_id = %principal.id(), "User deregistered");
        Ok(())
    }
}

fn validate<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|errors| {
        ApiError::Validation(
            first_violation(&errors)
                .unwrap_or_else(|| ValidationError::new("request", "invalid")),
        )
    })
}

fn record_login(outcome: &'static str) {
    metrics::counter!("myflix_login_attempts_total", "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{seed_user, test_secret, CapturedLogs, FailingStore};
    use crate::repositories::InMemoryUserStore;
    use std::sync::Arc;

    fn components(store: Arc<dyn UserStore>) -> (CredentialVerifier, TokenAuthority) {
        (
            CredentialVerifier::new(store.clone()),
            TokenAuthority::new(&test_secret(), 3600, store),
        )
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_returns_principal_and_token() {
        let store = Arc::new(InMemoryUserStore::new());
        let alice = seed_user(store.as_ref(), "alice", "pw").await;
        let (verifier, tokens) = components(store);

        let response = UserService::login(&verifier, &tokens, &login_request("alice", "pw"))
            .await
            .unwrap();

        assert_eq!(response.user.id, alice.id.to_string());
        assert_eq!(response.user.username, "alice");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert!(tokens.validate(&response.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_login_keeps_failure_reason_internally() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(store.as_ref(), "alice", "pw").await;
        let (verifier, tokens) = components(store);

        let wrong = UserService::login(&verifier, &tokens, &login_request("alice", "nope")).await;
        let unknown = UserService::login(&verifier, &tokens, &login_request("bob", "pw")).await;

        assert!(matches!(wrong, Err(ApiError::Auth(AuthFailure::PasswordMismatch))));
        assert!(matches!(unknown, Err(ApiError::Auth(AuthFailure::UserNotFound))));
    }

    #[tokio::test]
    async fn test_rejected_login_logs_reason_without_username() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(store.as_ref(), "alice", "pw").await;
        let (verifier, tokens) = components(store);
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let _ = UserService::login(&verifier, &tokens, &login_request("alice", "nope")).await;
        let _ = UserService::login(&verifier, &tokens, &login_request("p4ssw0rd!", "x")).await;

        let output = logs.contents();
        assert!(output.contains("Login rejected"));
        assert!(output.contains("user_not_found"));
        assert!(!output.contains("alice"));
        assert!(!output.contains("p4ssw0rd!"));
    }

    #[tokio::test]
    async fn test_login_empty_fields_fail_validation() {
        let (verifier, tokens) = components(Arc::new(InMemoryUserStore::new()));

        let result = UserService::login(&verifier, &tokens, &login_request("", "pw")).await;

        assert!(matches!(result, Err(ApiError::Validation(v)) if v.field == "username"));
    }

    #[tokio::test]
    async fn test_login_store_outage_is_store_error() {
        let (verifier, tokens) = components(Arc::new(FailingStore));

        let result = UserService::login(&verifier, &tokens, &login_request("alice", "pw")).await;

        assert!(matches!(result, Err(ApiError::Store(_))));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let (verifier, tokens) = components(store.clone());
        let req = RegisterRequest {
            username: "carol".to_string(),
            password: "secret".to_string(),
            email: "carol@example.com".to_string(),
            birthday: None,
        };

        let profile = UserService::register(store.as_ref(), &req).await.unwrap();
        let login = UserService::login(&verifier, &tokens, &login_request("carol", "secret"))
            .await
            .unwrap();

        assert_eq!(profile.id, login.user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_conflicts() {
        let store = Arc::new(InMemoryUserStore::new());
        seed_user(store.as_ref(), "carol", "pw").await;
        let req = RegisterRequest {
            username: "carol".to_string(),
            password: "secret".to_string(),
            email: "carol@example.com".to_string(),
            birthday: None,
        };

        let result = UserService::register(store.as_ref(), &req).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_deregister_then_profile_is_principal_not_found() {
        let store = Arc::new(InMemoryUserStore::new());
        let alice = Principal::from(&seed_user(store.as_ref(), "alice", "pw").await);

        UserService::deregister(store.as_ref(), &alice).await.unwrap();
        let result = UserService::get_profile(store.as_ref(), &alice).await;

        assert!(matches!(result, Err(ApiError::Auth(AuthFailure::PrincipalNotFound))));
    }
}
