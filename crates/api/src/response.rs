//! Response emission.
//!
//! Every body a handler produces is turned into an [`Outgoing`] first, and
//! [`Outgoing::finalize`] is the only place the envelope merge runs. Handlers
//! may supply as little as they like; the emitted JSON always carries
//! `success`, `message`, `data` and `meta`, with `meta.status` /
//! `meta.statusText` taken from the HTTP status actually sent.
//!
//! Use [`Reply`] in handlers instead of ad-hoc `serde_json::json!` bodies to
//! get typed payloads:
//!
//! ```ignore
//! async fn start(req: ApiRequest<Answer>) -> AppResult<Reply<Token>> {
//!     Ok(Reply::created(token).message("Round started"))
//! }
//! ```

use aiview_core::envelope::{merge_envelope, TransportFacts};
use aiview_core::types::JsonObject;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;

/// Transport facts for a status code: the numeric code and its reason phrase.
pub fn transport_facts(status: StatusCode) -> TransportFacts {
    TransportFacts::new(status.as_u16(), status.canonical_reason().unwrap_or_default())
}

/// A (possibly partial) body plus the status it will be sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub status: StatusCode,
    pub body: Value,
}

impl Outgoing {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// An error-variant body with the given message and data.
    pub fn failure(status: StatusCode, message: impl Into<String>, data: Value) -> Self {
        let mut body = JsonObject::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("message".into(), Value::String(message.into()));
        body.insert("data".into(), data);
        Self::new(status, Value::Object(body))
    }

    /// Add a `meta` entry. A non-object body is moved under `data` first.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut body = match self.body {
            Value::Object(body) => body,
            Value::Null => JsonObject::new(),
            other => JsonObject::from_iter([("data".to_string(), other)]),
        };
        let meta = body
            .entry("meta")
            .or_insert_with(|| Value::Object(JsonObject::new()));
        if !meta.is_object() {
            *meta = Value::Object(JsonObject::new());
        }
        if let Value::Object(meta) = meta {
            meta.insert(key.into(), value.into());
        }
        self.body = Value::Object(body);
        self
    }

    /// Apply envelope defaults and transport facts. Runs once per emitted body.
    pub fn finalize(self) -> (StatusCode, Value) {
        let facts = transport_facts(self.status);
        (self.status, merge_envelope(self.body, true, &facts))
    }
}

impl IntoResponse for Outgoing {
    fn into_response(self) -> Response {
        let (status, body) = self.finalize();
        (status, Json(body)).into_response()
    }
}

/// Anything a templated handler may return.
pub trait IntoOutgoing {
    fn into_outgoing(self) -> Outgoing;
}

impl IntoOutgoing for Outgoing {
    fn into_outgoing(self) -> Outgoing {
        self
    }
}

impl<R: IntoOutgoing> IntoOutgoing for Result<R, AppError> {
    fn into_outgoing(self) -> Outgoing {
        match self {
            Ok(reply) => reply.into_outgoing(),
            Err(err) => err.into_outgoing(),
        }
    }
}

#[derive(Debug, Clone)]
enum Payload<T, E> {
    Success(T),
    Failure(E),
}

/// Typed handler reply: success payload `T` or error payload `E`.
#[derive(Debug, Clone)]
pub struct Reply<T = Value, E = Value> {
    status: StatusCode,
    message: Option<String>,
    meta: JsonObject,
    payload: Payload<T, E>,
}

impl<T, E> Reply<T, E> {
    /// 200 OK with `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: None,
            meta: JsonObject::new(),
            payload: Payload::Success(data),
        }
    }

    /// 201 Created with `data`.
    pub fn created(data: T) -> Self {
        Self::ok(data).status(StatusCode::CREATED)
    }

    /// Error variant with an explicit status.
    pub fn failure(status: StatusCode, message: impl Into<String>, data: E) -> Self {
        Self {
            status,
            message: Some(message.into()),
            meta: JsonObject::new(),
            payload: Payload::Failure(data),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add handler metadata. `status` / `statusText` are always overwritten
    /// by the transport facts when the reply is emitted.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.payload, Payload::Success(_))
    }
}

impl<T: Serialize, E: Serialize> IntoOutgoing for Reply<T, E> {
    fn into_outgoing(self) -> Outgoing {
        let (success, data) = match &self.payload {
            Payload::Success(data) => (true, serde_json::to_value(data)),
            Payload::Failure(data) => (false, serde_json::to_value(data)),
        };
        let data = match data {
            Ok(data) => data,
            Err(err) => {
                return AppError::InternalError(format!("failed to serialize reply data: {err}"))
                    .into_outgoing()
            }
        };

        let mut body = JsonObject::new();
        body.insert("success".into(), Value::Bool(success));
        body.insert("data".into(), data);
        if let Some(message) = self.message {
            body.insert("message".into(), Value::String(message));
        }
        if !self.meta.is_empty() {
            body.insert("meta".into(), Value::Object(self.meta));
        }
        Outgoing::new(self.status, Value::Object(body))
    }
}

impl<T: Serialize, E: Serialize> IntoResponse for Reply<T, E> {
    fn into_response(self) -> Response {
        self.into_outgoing().into_response()
    }
}
