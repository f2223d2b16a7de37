//! Shared test harness: in-memory database, real router, oneshot requests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use orders_server::auth::JwtConfig;
use orders_server::db::DbService;
use orders_server::{Config, ServerState, api};

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        database_path: ":memory:".to_string(),
        environment: "test".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 15,
            refresh_expiration_days: 7,
            issuer: "orders-server".to_string(),
            audience: "orders-clients".to_string(),
        },
        password_min_length: 5,
        revoke_refresh_token_on_logout: false,
    }
}

pub async fn test_state() -> ServerState {
    test_state_with(test_config()).await
}

pub async fn test_state_with(config: Config) -> ServerState {
    let db = DbService::in_memory()
        .await
        .expect("in-memory database setup failed");
    ServerState::new(config, db.pool)
}

pub fn app(state: &ServerState) -> Router {
    api::build_app(state).with_state(state.clone())
}

/// Fire one request at the router and return (status, json body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _headers, body) = send_full(app, method, uri, token, body).await;
    (status, body)
}

pub async fn send_full(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, http::HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request dispatch failed");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

/// Register a fresh account and return (access token, refresh token).
pub async fn register_user(app: &Router, email: &str, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/account/register",
        None,
        Some(json!({
            "personName": "Test User",
            "phoneNumber": "123456789",
            "email": email,
            "username": username,
            "password": "secret1",
            "confirmPassword": "secret1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");

    let token = body["token"].as_str().expect("token missing").to_string();
    let refresh = body["refreshToken"]
        .as_str()
        .expect("refreshToken missing")
        .to_string();
    (token, refresh)
}
