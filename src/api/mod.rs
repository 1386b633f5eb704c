//! HTTP surface of `issue_tracker`.
//!
//! One resource route, `/api/issues/:project`, carries the whole API:
//! GET lists/filters, POST creates, PUT updates by `_id`, DELETE removes by
//! `_id`. All four respond with HTTP 200 whether they succeed or fail; the
//! body carries the outcome. `/health` answers liveness probes.

mod body;
mod issues;
pub mod response;

pub use body::BodyFields;

use crate::store::DocumentStore;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

/// Build the application router over the given store.
#[must_use]
pub fn router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route(
            "/api/issues/:project",
            get(issues::list)
                .post(issues::create)
                .put(issues::update)
                .delete(issues::remove),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Health check handler for the /health endpoint.
async fn health() -> &'static str {
    "OK"
}
