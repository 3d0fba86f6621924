//! Shared setup for the integration tests: a full router over the in-memory
//! store, plus request plumbing.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sitedesk_core::config::AppConfig;
use sitedesk_core::email::EmailProvider;
use sitedesk_core::error::ApiResult;
use sitedesk_core::state::AppState;
use sitedesk_core::store::{MemoryStore, UserOps};
use sitedesk_core::types::CreateUser;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-secret-32-chars-long!!!!";

pub struct NullEmailProvider;

#[async_trait]
impl EmailProvider for NullEmailProvider {
    async fn send(&self, _to: &str, _subject: &str, _text: &str, _html: &str) -> ApiResult<()> {
        Ok(())
    }
}

pub fn setup() -> (Router, AppState<MemoryStore>) {
    let config = AppConfig::new(TEST_SECRET)
        .base_url("http://localhost:3000")
        .email_provider(Arc::new(NullEmailProvider));
    let state = AppState::new(config, MemoryStore::new());
    let app = sitedesk_api::app(state.clone());
    (app, state)
}

/// Create a user and a live session, returning the bearer token.
pub async fn authed_user(state: &AppState<MemoryStore>, email: &str) -> (String, String) {
    let user = state
        .store
        .create_user(CreateUser::new(email))
        .await
        .unwrap();
    let session = state.sessions.create_session(&user.id).await.unwrap();
    (user.id, session.token)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, body).await
}
