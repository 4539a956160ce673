//! Authentication middleware
//!
//! `require_auth` gates a group of routes: it validates the bearer token and
//! stores the resolved [`Principal`] in the request extensions before any
//! handler runs. Handlers read it back with the [`AuthUser`] extractor.

use super::{AuthError, Principal};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))
}

/// Validate the request's bearer token against the token authority
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = bearer_token(headers)?;

    match state.tokens().validate(token).await {
        Ok(principal) => {
            metrics::counter!("myflix_token_validations_total", "outcome" => "accepted")
                .increment(1);
            Ok(principal)
        }
        Err(AuthError::Rejected(failure)) => {
            metrics::counter!("myflix_token_validations_total", "outcome" => failure.as_str())
                .increment(1);
            Err(ApiError::Auth(failure))
        }
        Err(e) => {
            warn!("Token validation could not complete: {}", e);
            Err(e.into())
        }
    }
}

/// Reject the request with 401 unless it carries a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// The authenticated principal for the current request.
///
/// Uses the principal stored by `require_auth` when present; otherwise
/// validates the Authorization header itself.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(AuthUser(principal.clone()));
        }

        let app_state = AppState::from_ref(state);
        let principal = authenticate(&app_state, &parts.headers).await?;
        Ok(AuthUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_other_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(matches!(bearer_token(&headers), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def.ghi"));

        assert!(bearer_token(&headers).is_err());
    }
}
