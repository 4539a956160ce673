//! Authentication routes
//!
//! `POST /api/v1/auth/login` exchanges a username/password pair for a bearer
//! token. Every credential failure gets the same 401 response.

use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use myflix_shared::types::{LoginRequest, LoginResponse};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login with username and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = UserService::login(state.credentials(), state.tokens(), &req).await?;
    Ok(Json(response))
}
