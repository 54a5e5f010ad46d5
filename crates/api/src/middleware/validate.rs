//! Request body parsing and schema validation.
//!
//! Runs before any handler attached through a [`ResponseTemplate`] with a
//! schema. On failure the handler is never invoked and the error envelope is
//! produced from the returned [`AppError`]:
//!
//! | Failure                          | Status | `data`                    |
//! |----------------------------------|--------|---------------------------|
//! | body exceeds the size limit      | 413    | `{}`                      |
//! | body is not JSON                 | 400    | `{}`                      |
//! | payload kind != schema kind      | 415    | `{}`                      |
//! | one or more fields invalid       | 422    | `{ field: message, .. }`  |
//! | schema could not be evaluated    | 500    | `{}`, `meta.origin` set   |
//!
//! [`ResponseTemplate`]: crate::template::ResponseTemplate

use std::error::Error as StdError;

use aiview_core::validation::{self, Schema};
use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::error::{AppError, AppResult, MALFORMED_BODY_MESSAGE};

/// Read the whole request body.
///
/// The size limit itself is enforced by `RequestBodyLimitLayer`; hitting it
/// while streaming surfaces here as [`AppError::PayloadTooLarge`].
pub async fn read_body(body: Body) -> AppResult<Bytes> {
    axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
        if exceeds_length_limit(&e) {
            tracing::debug!("Request body exceeded the size limit");
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(format!("Failed to read request body: {e}"))
        }
    })
}

/// Whether `err` (or anything in its source chain) is a body length limit.
fn exceeds_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Parse a JSON body. An empty (or whitespace-only) body is `null`.
pub fn parse_json_body(bytes: &[u8]) -> AppResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed JSON body");
        AppError::BadRequest(MALFORMED_BODY_MESSAGE.into())
    })
}

/// Parse `bytes` as JSON and, when a schema is given, validate it.
pub fn validate_request_body(schema: Option<&Schema>, bytes: &[u8]) -> AppResult<Value> {
    let payload = parse_json_body(bytes)?;
    match schema {
        Some(schema) => validate_payload(schema, payload),
        None => Ok(payload),
    }
}

/// Validate `payload` against `schema` and return the pruned payload.
pub fn validate_payload(schema: &Schema, payload: Value) -> AppResult<Value> {
    let validated = validation::validate(schema, payload)?;
    tracing::trace!(kind = %schema.kind(), "Request body passed validation");
    Ok(validated)
}
