//! Liveness and readiness probes
//!
//! Readiness is the only probe that touches the user store.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct Probe {
    pub status: &'static str,
    pub version: &'static str,
}

impl Probe {
    fn new(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

pub async fn health_check() -> Json<Probe> {
    Probe::new("healthy")
}

pub async fn liveness_check() -> Json<Probe> {
    Probe::new("alive")
}

/// 503 while the user store cannot be reached. The cause is logged, not returned.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    match state.store().health_check().await {
        Ok(()) => (StatusCode::OK, Probe::new("ready")),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Probe::new("not_ready"))
        }
    }
}
