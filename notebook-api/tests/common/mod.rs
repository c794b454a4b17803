//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A fresh in-memory database per test, migrated
//! - The full router, driven with `tower::ServiceExt::oneshot`
//! - Test user creation and login
//! - Request and response helpers

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use notebook_api::app::{build_router, AppState};
use notebook_api::config::Config;
use notebook_shared::auth::password::hash_password;
use notebook_shared::db::migrations::run_migrations;
use notebook_shared::db::pool::{create_pool, DatabaseConfig};
use notebook_shared::models::user::{CreateUser, User};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "Secret123!";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_lookup(|key| match key {
            "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        })?;

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Ok(TestContext { db, app, config })
    }

    /// Creates a user directly in the database with `TEST_PASSWORD`
    pub async fn create_user(&self, username: &str) -> anyhow::Result<User> {
        let user = User::create(
            &self.db,
            CreateUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: hash_password(TEST_PASSWORD)?,
            },
        )
        .await?;

        Ok(user)
    }

    /// Logs in through the login page and returns the `Cookie` header value
    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<String> {
        let body = format!("username={}&password={}", username, encode(password));
        let response = self.post_form("/login/", &body, None).await;

        anyhow::ensure!(
            response.status() == StatusCode::FOUND,
            "login failed with status {}",
            response.status()
        );

        session_cookie(&response).ok_or_else(|| anyhow::anyhow!("no session cookie set"))
    }

    /// Creates a user and logs in as them
    pub async fn user_with_session(&self, username: &str) -> anyhow::Result<(User, String)> {
        let user = self.create_user(username).await?;
        let cookie = self.login(username, TEST_PASSWORD).await?;
        Ok((user, cookie))
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }
}

/// Percent-encodes a form value
pub fn encode(value: &str) -> String {
    let mut encoded = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Value of the `Location` header
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `sessionid=<token>` from the response's `Set-Cookie` headers, if one sets it
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("sessionid=") && pair.len() > "sessionid=".len())
        .map(str::to_string)
}

/// Reads the whole response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8_lossy(&bytes).into_owned()
}
