//! Configuration management for the myFlix backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: MYFLIX__)
//!
//! The JWT signing secret has no default. It must come from a config file or
//! `MYFLIX__JWT__SECRET`.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;

/// Default token validity window: 7 days
pub const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest accepted token validity window: 365 days
pub const MAX_TOKEN_VALIDITY_SECS: i64 = 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
///
/// When `url` is unset the backend runs against the in-memory user store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
}

/// JWT configuration
///
/// `Debug` output of the secret is redacted by `secrecy`.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub token_validity_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: SecretString::new(String::new()),
                token_validity_secs: DEFAULT_TOKEN_VALIDITY_SECS,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with MYFLIX__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.max_connections", 10_i64)?
            .set_default("jwt.token_validity_secs", DEFAULT_TOKEN_VALIDITY_SECS)?
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (MYFLIX__ prefix)
            // e.g., MYFLIX__JWT__SECRET sets jwt.secret
            .add_source(config::Environment::with_prefix("MYFLIX").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the auth core cannot run with
    pub fn validate(&self) -> Result<()> {
        let secret = self.jwt.secret.expose_secret();

        if secret.trim().is_empty() {
            anyhow::bail!("jwt.secret must be set (MYFLIX__JWT__SECRET)");
        }
        if !(1..=MAX_TOKEN_VALIDITY_SECS).contains(&self.jwt.token_validity_secs) {
            anyhow::bail!(
                "jwt.token_validity_secs must be between 1 and {}",
                MAX_TOKEN_VALIDITY_SECS
            );
        }
        if Self::is_production() && (secret.len() < 32 || secret.contains("development")) {
            anyhow::bail!("jwt.secret must be at least 32 characters and not contain 'development'");
        }

        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
