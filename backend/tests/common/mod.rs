//! Common test utilities for integration tests
//!
//! `TestApp` runs the full router against an in-memory user store and a
//! manually driven clock, so token expiry can be tested without waiting.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::Username, Fake};
use myflix_backend::{
    auth::{ManualClock, PasswordService},
    config::AppConfig,
    repositories::{InMemoryUserStore, NewUser, UserRecord, UserStore},
    routes,
    state::AppState,
};
use secrecy::SecretString;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryUserStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(store.clone(), test_config()).with_clock(clock.clone());
        let app = routes::create_router(state.clone());

        Self {
            app,
            state,
            store,
            clock,
        }
    }

    /// Register a user directly in the store
    pub async fn create_user(&self, username: &str, password: &str) -> UserRecord {
        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .unwrap();
        self.store
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                email: format!("{}@example.com", username),
                birthday: None,
            })
            .await
            .unwrap()
    }

    /// Register a user with a generated username
    pub async fn create_random_user(&self, password: &str) -> UserRecord {
        let username: String = Username().fake();
        self.create_user(&username, password).await
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a DELETE request with a bearer token
    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({ "username": username, "password": password });
        let (status, response) = self.post("/api/v1/auth/login", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", response);

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        response["token"].as_str().unwrap().to_string()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = SecretString::new(TEST_SECRET.to_string());
    config
}
