//! In-process harness: the full router over a fresh `MemoryStore`, driven with `oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use killedinlocalhost::{app, auth::TokenKeys, config::AppConfig, database::MemoryStore, AppState};

pub struct TestApp {
    router: Router,
}

pub struct Account {
    pub token: String,
    pub id: String,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        let keys = TokenKeys::new("router-test-secret", 1).expect("token keys");
        let state = AppState::new(Arc::new(MemoryStore::new()), keys);
        Self { router: app(state, &config) }
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.raw(request).await
    }

    pub async fn signup(&self, email: &str) -> Account {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/user/signup",
                None,
                Some(json!({ "email": email, "password": "hunter22", "name": null })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");
        Account {
            token: body["token"].as_str().expect("token").to_string(),
            id: body["user"]["id"].as_str().expect("user id").to_string(),
        }
    }

    /// Create a project owned by `token` and return its id.
    pub async fn project(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/projects",
                Some(token),
                Some(json!({ "title": title, "content": "It worked on my machine." })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body["id"].as_str().expect("project id").to_string()
    }
}
