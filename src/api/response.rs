//! Fixed wire contract for issue API responses.
//!
//! Every outcome leaves with HTTP 200; success and failure are told apart
//! by the body (`result`/record data vs `error`). Clients depend on the
//! literal message strings, so they live here as constants.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

pub const ERR_LOOKUP: &str = "unable to locate project or issues";
pub const ERR_REQUIRED: &str = "required field(s) missing";
pub const ERR_MISSING_ID: &str = "missing _id";
pub const ERR_NO_UPDATE: &str = "no update field(s) sent";
pub const ERR_UPDATE: &str = "could not update";
pub const ERR_DELETE: &str = "could not delete";

pub const MSG_UPDATED: &str = "successfully updated";
pub const MSG_DELETED: &str = "successfully deleted";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ActionBody {
    result: &'static str,
    #[serde(rename = "_id")]
    id: String,
}

/// `{"error": <message>}` at HTTP 200.
pub fn error(message: &'static str) -> Response {
    Json(ErrorBody {
        error: message,
        id: None,
    })
    .into_response()
}

/// `{"error": <message>, "_id": <id>}` at HTTP 200.
///
/// The identifier is echoed exactly as the client sent it, whatever JSON
/// value that was.
pub fn error_with_id(message: &'static str, id: Value) -> Response {
    Json(ErrorBody {
        error: message,
        id: Some(id),
    })
    .into_response()
}

/// `{"result": <message>, "_id": <id>}` at HTTP 200.
pub fn action(message: &'static str, id: String) -> Response {
    Json(ActionBody {
        result: message,
        id,
    })
    .into_response()
}
