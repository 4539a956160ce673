//! Fixtures shared by the auth unit tests

use super::PasswordService;
use crate::repositories::{NewUser, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use secrecy::SecretString;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn test_secret() -> SecretString {
    SecretString::new(TEST_SECRET.to_string())
}

/// Register a user with an argon2-hashed password
pub async fn seed_user(store: &dyn UserStore, username: &str, password: &str) -> UserRecord {
    let password_hash = PasswordService::hash_async(password.to_string())
        .await
        .unwrap();
    store
        .create(NewUser {
            username: username.to_string(),
            password_hash,
            email: format!("{}@example.com", username),
            birthday: None,
        })
        .await
        .unwrap()
}

/// A store whose every call fails as if the database were down
pub struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn create(&self, _new_user: NewUser) -> Result<UserRecord, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Collects formatted log output written while its guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route events on this thread to the buffer until the guard drops
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
