#![allow(dead_code)]

//! Shared helpers for integration tests.
//!
//! `test_app()` builds the real router over an in-memory store; requests
//! are driven in-process with `tower::ServiceExt::oneshot`, no network.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use issue_tracker::api;
use issue_tracker::store::SqliteStore;
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(issue_tracker::logging::init_test_logging);
}

/// The application router over a fresh in-memory store.
pub fn test_app() -> Router {
    init_test_logging();
    let store = SqliteStore::open_memory().expect("in-memory store");
    api::router(Arc::new(store))
}

/// Drive one request through the router and decode the JSON body.
///
/// A `Some` body is sent as `application/json`; `None` sends an empty body
/// with no content type.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router serves");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, value)
}

/// Drive one request with a URL-encoded form body.
pub async fn send_form(
    app: &Router,
    method: Method,
    uri: &str,
    form: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router serves");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    (status, serde_json::from_slice(&bytes).expect("body is JSON"))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(body)).await
}

/// Create an issue and return its `_id`, asserting the create succeeded.
pub async fn create_issue(app: &Router, project: &str, body: &Value) -> String {
    let (status, created) = post(app, &format!("/api/issues/{project}"), body).await;
    assert_eq!(status, StatusCode::OK);
    created["_id"]
        .as_str()
        .unwrap_or_else(|| panic!("create did not return an _id: {created}"))
        .to_string()
}
