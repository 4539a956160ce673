//! myFlix Backend
//!
//! Movie catalog API server. Login issues a signed bearer token; protected
//! routes re-validate that token on every request.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: login/registration flows
//! - Auth: credential verification and token authority
//! - Repositories: user store (Postgres or in-memory)

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use myflix_backend::{
    config,
    db,
    repositories::{InMemoryUserStore, PgUserStore, UserStore},
    routes,
    state::AppState,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    // Fails fast when the signing secret is missing
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting myFlix backend"
    );

    let store = connect_store(&config).await?;

    let mut state = AppState::new(store, config.clone());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics recorder not installed: {}", e),
    }

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Pick the user store: Postgres when a URL is configured, otherwise memory
async fn connect_store(config: &config::AppConfig) -> Result<Arc<dyn UserStore>> {
    match db::connect(&config.database).await? {
        Some(pool) => {
            // Production runs migrations as a separate job
            if !config::AppConfig::is_production() {
                db::run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgUserStore::new(pool)))
        }
        None => {
            warn!("No database.url configured; using the in-memory user store");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "myflix_backend=info,tower_http=info".into()
        } else {
            "myflix_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
