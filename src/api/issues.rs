//! Handlers for the `/api/issues/:project` resource.
//!
//! Each handler owns one leg of the contract: it builds typed input with
//! the `model` builders, makes a single store call, and folds every failure
//! into the fixed response bodies. No error propagates past this module;
//! underlying causes are logged where they are swallowed.

use crate::api::AppState;
use crate::api::body::BodyFields;
use crate::api::response::{
    self, ERR_DELETE, ERR_LOOKUP, ERR_MISSING_ID, ERR_NO_UPDATE, ERR_REQUIRED, ERR_UPDATE,
    MSG_DELETED, MSG_UPDATED,
};
use crate::error::{Result, TrackerError};
use crate::model::{self, Issue, NewIssue};
use crate::store::{DocumentId, Fields};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// GET: list the project's issues, filtered by whitelisted query params.
pub async fn list(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let filter = match model::build_filter(&params) {
        Ok(filter) => filter,
        Err(err) => {
            debug!(%project, %err, "rejecting unusable filter");
            return response::error(ERR_LOOKUP);
        }
    };

    let issues = state.store.find(&project, &filter).await.and_then(|docs| {
        docs.into_iter()
            .map(Issue::from_document)
            .collect::<Result<Vec<_>>>()
    });

    match issues {
        Ok(issues) => Json(issues).into_response(),
        Err(err) => {
            warn!(%project, %err, "issue lookup failed");
            response::error(ERR_LOOKUP)
        }
    }
}

/// POST: create an issue from the body, applying defaults.
pub async fn create(
    State(state): State<AppState>,
    Path(project): Path<String>,
    BodyFields(body): BodyFields,
) -> Response {
    let issue = match NewIssue::from_fields(&body) {
        Ok(issue) => issue,
        Err(err) => {
            debug!(%project, %err, "rejecting issue creation");
            return response::error(ERR_REQUIRED);
        }
    };

    let created = match issue.into_fields() {
        Ok(fields) => state.store.insert(&project, fields).await,
        Err(err) => Err(err),
    }
    .and_then(Issue::from_document);

    match created {
        Ok(issue) => Json(issue).into_response(),
        Err(err) => {
            warn!(%project, %err, "issue creation failed");
            response::error(ERR_REQUIRED)
        }
    }
}

/// PUT: apply a partial update to the issue named by `_id`.
pub async fn update(
    State(state): State<AppState>,
    Path(project): Path<String>,
    BodyFields(body): BodyFields,
) -> Response {
    let Some(raw_id) = provided_id(&body) else {
        return response::error(ERR_MISSING_ID);
    };
    let raw_id = raw_id.clone();

    let set = match model::build_update_set(&body) {
        Ok(Some(set)) => set,
        Ok(None) => return response::error_with_id(ERR_NO_UPDATE, raw_id),
        Err(err) => {
            debug!(%project, %err, "rejecting update payload");
            return response::error_with_id(ERR_UPDATE, raw_id);
        }
    };

    let Ok(id) = parse_id(&raw_id) else {
        return response::error_with_id(ERR_UPDATE, raw_id);
    };

    match state.store.update_by_id(&project, id, set).await {
        Ok(Some(document)) => response::action(MSG_UPDATED, document.id.to_string()),
        Ok(None) => response::error_with_id(ERR_UPDATE, raw_id),
        Err(err) => {
            warn!(%project, %err, "issue update failed");
            response::error_with_id(ERR_UPDATE, raw_id)
        }
    }
}

/// DELETE: remove the issue named by `_id`.
pub async fn remove(
    State(state): State<AppState>,
    Path(project): Path<String>,
    BodyFields(body): BodyFields,
) -> Response {
    let Some(raw_id) = provided_id(&body) else {
        return response::error(ERR_MISSING_ID);
    };
    let raw_id = raw_id.clone();

    let Ok(id) = parse_id(&raw_id) else {
        return response::error_with_id(ERR_DELETE, raw_id);
    };

    match state.store.delete_by_id(&project, id).await {
        Ok(Some(document)) => response::action(MSG_DELETED, document.id.to_string()),
        Ok(None) => response::error_with_id(ERR_DELETE, raw_id),
        Err(err) => {
            warn!(%project, %err, "issue deletion failed");
            response::error_with_id(ERR_DELETE, raw_id)
        }
    }
}

/// The `_id` value, if it was sent and is not a falsy placeholder.
///
/// Null, `false`, zero, and the empty string count as missing; clients
/// depend on `_id: ""` yielding the missing-_id error rather than a lookup.
fn provided_id(body: &Fields) -> Option<&Value> {
    let value = body.get("_id")?;
    let missing = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    };
    (!missing).then_some(value)
}

fn parse_id(raw: &Value) -> Result<DocumentId> {
    match raw {
        Value::String(s) => s.parse(),
        _ => Err(TrackerError::invalid_id(raw.to_string())),
    }
}
