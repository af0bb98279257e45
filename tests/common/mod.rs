#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use gamecafe::auth::{issue_session_token, SESSION_COOKIE};
use gamecafe::config::AppConfig;
use gamecafe::database::models::User;
use gamecafe::database::{Database, MemoryStore};
use gamecafe::types::Role;
use gamecafe::{app, AppState};

pub const PASSWORD: &str = "correct horse battery";

/// The full router over fresh in-memory stores. The users store is kept
/// separately so tests can count writes.
pub struct TestApp {
    pub state: AppState,
    pub users: Arc<MemoryStore<User>>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(MemoryStore::<User>::new());
        let db = Database { users: users.clone(), ..Database::memory() };
        let state = AppState::new(config, db);
        Self { router: app(state.clone()), state, users }
    }

    pub async fn create_user(&self, username: &str, role: Role) -> Result<User> {
        let user = User::new(&format!("{}@example.com", username), username, PASSWORD, role)?;
        Ok(self.state.db.users.save(user).await?)
    }

    /// Session token as issued at sign in
    pub fn token_for(&self, user: &User) -> Result<String> {
        let id = user.id.context("user has not been saved")?;
        Ok(issue_session_token(&self.state.config.security, id)?)
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(request(Method::GET, path, token).body(Body::empty())?).await
    }

    pub async fn get_with_cookies(&self, path: &str, cookies: &[String]) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::COOKIE, cookies.join("; "))
            .body(Body::empty())?;
        self.send(request).await
    }

    pub async fn json(&self, method: Method, path: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        let request = request(method, path, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    pub async fn empty(&self, method: Method, path: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(request(method, path, token).body(Body::empty())?).await
    }

    pub async fn form(&self, path: &str, token: Option<&str>, fields: &[(&str, &str)]) -> Result<TestResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = request(Method::POST, path, token)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        self.send(request).await
    }
}

/// Signed-in requests carry the token in the session cookie, like a browser
fn request(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(path);
    match token {
        Some(token) => builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token)),
        None => builder,
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.secret_key = "integration-test-secret".to_string();
    config
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).with_context(|| format!("body is not JSON: {:?}", self.body))
    }

    /// Template name chosen by the default JSON renderer
    pub fn template(&self) -> Result<String> {
        let value = self.json()?;
        value["template"]
            .as_str()
            .map(str::to_string)
            .context("response is not a rendered page")
    }

    pub fn context(&self) -> Result<Value> {
        Ok(self.json()?["context"].clone())
    }

    /// Flash message texts shown on a rendered page
    pub fn messages(&self) -> Result<Vec<String>> {
        let context = self.context()?;
        Ok(context["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["message"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    /// `name=value` pairs from every Set-Cookie header
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string())
            .collect()
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies()
            .into_iter()
            .find(|pair| pair.split('=').next() == Some(name))
    }
}
