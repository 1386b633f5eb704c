//! Core data types for `issue_tracker`.
//!
//! This module defines the Issue record plus everything that polices its
//! shape at the boundary:
//! - `Issue` / `NewIssue` - the persisted record and its creation form
//! - `ISSUE_FIELDS` - the static whitelist of client-visible fields
//! - casting of query/body values into each field's kind
//! - filter and update-set builders used by the HTTP handlers

use crate::error::{Result, TrackerError};
use crate::store::{Document, DocumentId, Fields};
use crate::util::time::{parse_timestamp, timestamp_from_millis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cast target of a whitelisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Timestamp,
    Flag,
}

/// Descriptor of one whitelisted Issue field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name of the field.
    pub name: &'static str,
    /// Kind incoming values are cast to.
    pub kind: FieldKind,
    /// Creation fails when the field is absent or empty.
    pub required: bool,
    /// Updates may rewrite the field. `created_on` is fixed at creation.
    pub mutable: bool,
}

/// The static field whitelist, in wire-schema order.
///
/// Filter and update membership tests iterate exactly this table; input
/// keys outside it are ignored everywhere. The identifier `_id` is handled
/// separately and is never filterable or updatable.
pub const ISSUE_FIELDS: [FieldSpec; 8] = [
    FieldSpec {
        name: "issue_title",
        kind: FieldKind::Text,
        required: true,
        mutable: true,
    },
    FieldSpec {
        name: "issue_text",
        kind: FieldKind::Text,
        required: true,
        mutable: true,
    },
    FieldSpec {
        name: "created_on",
        kind: FieldKind::Timestamp,
        required: false,
        mutable: false,
    },
    FieldSpec {
        name: "updated_on",
        kind: FieldKind::Timestamp,
        required: false,
        mutable: true,
    },
    FieldSpec {
        name: "created_by",
        kind: FieldKind::Text,
        required: true,
        mutable: true,
    },
    FieldSpec {
        name: "assigned_to",
        kind: FieldKind::Text,
        required: false,
        mutable: true,
    },
    FieldSpec {
        name: "open",
        kind: FieldKind::Flag,
        required: false,
        mutable: true,
    },
    FieldSpec {
        name: "status_text",
        kind: FieldKind::Text,
        required: false,
        mutable: true,
    },
];

/// A tracked issue as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub issue_title: String,
    pub issue_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub created_by: String,
    pub assigned_to: String,
    pub open: bool,
    pub status_text: String,
}

impl Issue {
    /// Decode a stored document into a typed issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the document body does not carry every issue
    /// field with the expected type.
    pub fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(document.into_json())?)
    }
}

/// A validated issue ready to be inserted, identifier not yet assigned.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub created_by: String,
    pub assigned_to: String,
    pub open: bool,
    pub status_text: String,
}

impl NewIssue {
    /// Validate a creation body and apply defaults.
    ///
    /// Required fields (`issue_title`, `issue_text`, `created_by`) must be
    /// present, castable to text, and non-empty. Defaults apply only to
    /// absent (or JSON null) fields: timestamps default to now, text to the
    /// empty string, `open` to true. An explicit `open: false` is honored.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn from_fields(body: &Fields) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            issue_title: required_text(body, "issue_title")?,
            issue_text: required_text(body, "issue_text")?,
            created_on: optional_timestamp(body, "created_on")?.unwrap_or(now),
            updated_on: optional_timestamp(body, "updated_on")?.unwrap_or(now),
            created_by: required_text(body, "created_by")?,
            assigned_to: optional_text(body, "assigned_to")?.unwrap_or_default(),
            open: optional_flag(body, "open")?.unwrap_or(true),
            status_text: optional_text(body, "status_text")?.unwrap_or_default(),
        })
    }

    /// Serialize into the field map handed to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn into_fields(self) -> Result<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(TrackerError::validation(
                "issue",
                "serialized to a non-object",
            )),
        }
    }
}

/// Build a store filter from query parameters.
///
/// Only whitelisted field names are copied; every other parameter is
/// ignored. Values are cast to the field's kind, so `?open=true` matches
/// documents whose `open` is the boolean true.
///
/// # Errors
///
/// Returns a validation error if a whitelisted parameter cannot be cast.
pub fn build_filter(params: &HashMap<String, String>) -> Result<Fields> {
    let mut filter = Fields::new();
    for spec in &ISSUE_FIELDS {
        if let Some(raw) = params.get(spec.name) {
            filter.insert(spec.name.to_string(), cast_param(spec, raw)?);
        }
    }
    Ok(filter)
}

/// Build the patch applied by an update from a request body.
///
/// Membership is presence-based over the whitelist: returns `Ok(None)` when
/// no whitelisted key is in the body at all. Otherwise every present value
/// is cast (a bad value is an error), `created_on` is dropped from the
/// applied patch, and `updated_on` is stamped with the current time,
/// overriding any client-sent value.
///
/// # Errors
///
/// Returns a validation error if a present value cannot be cast.
pub fn build_update_set(body: &Fields) -> Result<Option<Fields>> {
    let present: Vec<(&FieldSpec, &Value)> = ISSUE_FIELDS
        .iter()
        .filter_map(|spec| body.get(spec.name).map(|value| (spec, value)))
        .collect();

    if present.is_empty() {
        return Ok(None);
    }

    let mut set = Fields::new();
    for (spec, value) in present {
        let cast = cast_value(spec, value)?;
        if spec.mutable {
            set.insert(spec.name.to_string(), cast);
        }
    }
    set.insert("updated_on".to_string(), timestamp_value(Utc::now())?);

    Ok(Some(set))
}

/// Cast a JSON body value to the canonical stored form of a field.
///
/// Text accepts strings as-is and stringifies scalars (a JSON `123` is the
/// title `"123"`); flags accept booleans, `0`/`1`, and the usual textual
/// spellings; timestamps accept RFC3339, `YYYY-MM-DD`, and epoch
/// milliseconds.
///
/// # Errors
///
/// Returns a validation error naming the field if the value cannot be cast.
pub fn cast_value(spec: &FieldSpec, value: &Value) -> Result<Value> {
    match spec.kind {
        FieldKind::Text => cast_text(value, spec.name).map(Value::String),
        FieldKind::Flag => cast_flag(value, spec.name).map(Value::Bool),
        FieldKind::Timestamp => timestamp_value(cast_timestamp(value, spec.name)?),
    }
}

/// Cast a query-string value to the canonical stored form of a field.
///
/// # Errors
///
/// Returns a validation error naming the field if the value cannot be cast.
pub fn cast_param(spec: &FieldSpec, raw: &str) -> Result<Value> {
    match spec.kind {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Flag => parse_flag(raw)
            .map(Value::Bool)
            .ok_or_else(|| TrackerError::validation(spec.name, "expected a boolean")),
        FieldKind::Timestamp => timestamp_value(parse_timestamp(raw, spec.name)?),
    }
}

fn cast_text(value: &Value, field_name: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(TrackerError::validation(field_name, "expected text")),
    }
}

fn cast_flag(value: &Value, field_name: &str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => parse_flag(s)
            .ok_or_else(|| TrackerError::validation(field_name, "expected a boolean")),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(TrackerError::validation(field_name, "expected a boolean")),
        },
        _ => Err(TrackerError::validation(field_name, "expected a boolean")),
    }
}

fn cast_timestamp(value: &Value, field_name: &str) -> Result<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s, field_name),
        Value::Number(n) => {
            let millis = n.as_i64().ok_or_else(|| {
                TrackerError::validation(field_name, "expected epoch milliseconds")
            })?;
            timestamp_from_millis(millis, field_name)
        }
        _ => Err(TrackerError::validation(field_name, "expected a timestamp")),
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn timestamp_value(dt: DateTime<Utc>) -> Result<Value> {
    Ok(serde_json::to_value(dt)?)
}

/// A field value, ignoring JSON null (treated as absent).
fn provided<'a>(body: &'a Fields, name: &str) -> Option<&'a Value> {
    body.get(name).filter(|value| !value.is_null())
}

fn required_text(body: &Fields, name: &str) -> Result<String> {
    let value = provided(body, name)
        .ok_or_else(|| TrackerError::validation(name, "required field is missing"))?;
    let text = cast_text(value, name)?;
    if text.is_empty() {
        return Err(TrackerError::validation(name, "required field is empty"));
    }
    Ok(text)
}

fn optional_text(body: &Fields, name: &str) -> Result<Option<String>> {
    provided(body, name)
        .map(|value| cast_text(value, name))
        .transpose()
}

fn optional_flag(body: &Fields, name: &str) -> Result<Option<bool>> {
    provided(body, name)
        .map(|value| cast_flag(value, name))
        .transpose()
}

fn optional_timestamp(body: &Fields, name: &str) -> Result<Option<DateTime<Utc>>> {
    provided(body, name)
        .map(|value| cast_timestamp(value, name))
        .transpose()
}
