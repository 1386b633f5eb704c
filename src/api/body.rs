//! Tolerant request-body extraction.

use crate::store::Fields;
use axum::Form;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// The request body as a field map.
///
/// Accepts JSON objects and URL-encoded forms (form values arrive as
/// strings and are cast downstream). Everything else degrades to an empty
/// map: no body, a non-object JSON value, an unhandled content type. The
/// one transport-level rejection is syntactically invalid JSON under a JSON
/// content type, which is a 400 before any contract logic runs.
pub struct BodyFields(pub Fields);

enum BodyFormat {
    Json,
    Form,
    Unspecified,
    Other,
}

fn body_format(headers: &HeaderMap) -> BodyFormat {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyFormat::Form
    } else if content_type.starts_with("application/json") {
        BodyFormat::Json
    } else if content_type.is_empty() {
        BodyFormat::Unspecified
    } else {
        BodyFormat::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for BodyFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_format(req.headers()) {
            BodyFormat::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|err| {
                        (StatusCode::BAD_REQUEST, err.to_string()).into_response()
                    })?;
                Ok(Self(
                    pairs
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                ))
            }
            BodyFormat::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                if bytes.is_empty() {
                    return Ok(Self(Fields::new()));
                }
                match serde_json::from_slice::<Value>(&bytes) {
                    Ok(Value::Object(fields)) => Ok(Self(fields)),
                    Ok(_) => Ok(Self(Fields::new())),
                    Err(err) => Err((
                        StatusCode::BAD_REQUEST,
                        format!("invalid JSON body: {err}"),
                    )
                        .into_response()),
                }
            }
            BodyFormat::Unspecified => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                match serde_json::from_slice::<Value>(&bytes) {
                    Ok(Value::Object(fields)) => Ok(Self(fields)),
                    _ => Ok(Self(Fields::new())),
                }
            }
            BodyFormat::Other => Ok(Self(Fields::new())),
        }
    }
}
