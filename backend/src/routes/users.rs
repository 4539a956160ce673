//! User routes
//!
//! Registration is public; everything under `/me` sits behind `require_auth`.

use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use myflix_shared::types::{RegisterRequest, UserProfile};

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_me).delete(delete_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/", post(register)).merge(protected)
}

/// POST /api/v1/users - Register a new user
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = UserService::register(state.store(), &req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/users/me - Profile of the authenticated user
async fn get_me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(state.store(), &principal).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/users/me - Deregister the authenticated user
async fn delete_me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<StatusCode> {
    UserService::deregister(state.store(), &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}
