//! User store abstraction and its implementations
//!
//! The auth core only talks to [`UserStore`]. Production uses Postgres via
//! [`PgUserStore`]; tests and database-less runs use [`InMemoryUserStore`].

use crate::auth::PasswordService;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod user;

pub use memory::InMemoryUserStore;
pub use user::PgUserStore;

/// Infrastructure failures of the user store.
///
/// Kept apart from `AuthFailure`: these are never the caller's fault and are
/// surfaced as 500-class errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username already taken: {0}")]
    Conflict(String),

    #[error("User store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// User record as held by the store
#[derive(Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Check a plaintext candidate against the stored hash.
    ///
    /// Returns `Ok(true)` on match. An unparseable stored hash is an error,
    /// not a mismatch.
    pub async fn verify_password(&self, candidate: &str) -> anyhow::Result<bool> {
        PasswordService::verify_async(candidate.to_string(), self.password_hash.clone()).await
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("birthday", &self.birthday)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Input for creating a user. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Read/write access to registered users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find user by username (exact match)
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Create a user, failing with `StoreError::Conflict` on a taken username
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError>;

    /// Delete a user. Returns false if no such user existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Check the store is reachable
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
