use aiview_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::response::{IntoOutgoing, Outgoing};

/// Message sent with a 422 when one or more fields fail validation.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data found";
/// Message sent with a 415 when the payload has the wrong structural kind.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload type";
/// Message sent with a 400 when the body is not valid JSON.
pub const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON body";
/// Message sent with a 413 when the body exceeds the configured limit.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large";
/// Message sent with every 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
/// `meta.origin` of a 500 raised while evaluating a schema.
pub const SCHEMA_ERROR_ORIGIN: &str = "Error occurred during schema validation.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for validation failures and adds HTTP-specific
/// variants. Every variant is emitted as an error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A validation or schema error from `aiview_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured size limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// A missing resource or route.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message. The message is
    /// logged, never sent.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoOutgoing for AppError {
    fn into_outgoing(self) -> Outgoing {
        match self {
            AppError::Core(CoreError::Validation(errors)) => {
                tracing::debug!(fields = errors.len(), %errors, "Request failed validation");
                Outgoing::failure(StatusCode::UNPROCESSABLE_ENTITY, INVALID_DATA_MESSAGE, json!(errors))
            }
            AppError::Core(CoreError::UnsupportedPayload { expected, found }) => {
                tracing::debug!(%expected, %found, "Request payload has the wrong kind");
                Outgoing::failure(
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    INVALID_PAYLOAD_MESSAGE,
                    Value::Object(Default::default()),
                )
            }
            AppError::Core(CoreError::Schema(msg)) => {
                tracing::error!(error = %msg, "Schema evaluation failed");
                Outgoing::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE,
                    Value::Object(Default::default()),
                )
                .with_meta("origin", SCHEMA_ERROR_ORIGIN)
            }
            AppError::BadRequest(msg) => {
                Outgoing::failure(StatusCode::BAD_REQUEST, msg, Value::Object(Default::default()))
            }
            AppError::PayloadTooLarge => Outgoing::failure(
                StatusCode::PAYLOAD_TOO_LARGE,
                PAYLOAD_TOO_LARGE_MESSAGE,
                Value::Object(Default::default()),
            ),
            AppError::NotFound(msg) => {
                Outgoing::failure(StatusCode::NOT_FOUND, msg, Value::Object(Default::default()))
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Outgoing::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE,
                    Value::Object(Default::default()),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_outgoing().into_response()
    }
}
