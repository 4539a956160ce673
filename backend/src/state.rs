//! Application state management
//!
//! Shared state handed to every request handler via Axum's state extraction.
//! Everything is built once at startup and is read-only afterwards; cloning
//! is a handful of `Arc` increments.

use crate::auth::{Clock, CredentialVerifier, TokenAuthority};
use crate::config::AppConfig;
use crate::repositories::UserStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registered users
    pub store: Arc<dyn UserStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Username/password checks
    pub credentials: CredentialVerifier,
    /// Token issuance and validation with pre-computed keys
    pub tokens: TokenAuthority,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Derives the JWT keys from the configured secret; call once at startup.
    pub fn new(store: Arc<dyn UserStore>, config: AppConfig) -> Self {
        let tokens = TokenAuthority::new(
            &config.jwt.secret,
            config.jwt.token_validity_secs,
            store.clone(),
        );

        Self {
            credentials: CredentialVerifier::new(store.clone()),
            tokens,
            store,
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Replace the token authority's time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn credentials(&self) -> &CredentialVerifier {
        &self.credentials
    }

    #[inline]
    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }
}
