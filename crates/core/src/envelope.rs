//! The uniform response envelope.
//!
//! Every body that leaves the server, and every value a client call resolves
//! to, has the same four keys:
//!
//! ```text
//! { "success": bool, "message": string, "data": <payload>, "meta": {..} }
//! ```
//!
//! `success` is the discriminant between [`Success`] and [`Failure`]. The
//! [`merge_envelope`] routine is the single place where partial bodies get
//! their defaults and where transport facts (`status`, `statusText`) are
//! written into `meta`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::types::JsonObject;

/// `meta` key carrying the numeric HTTP status.
pub const META_STATUS: &str = "status";
/// `meta` key carrying the HTTP status text.
pub const META_STATUS_TEXT: &str = "statusText";

/// Success variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Success<T, M = JsonObject> {
    #[serde(default)]
    pub message: String,
    pub data: T,
    pub meta: M,
}

/// Error variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure<E, M = JsonObject> {
    #[serde(default)]
    pub message: String,
    pub data: E,
    pub meta: M,
}

/// Success/error response union, discriminated on the wire by `success`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T = Value, E = Value, M = JsonObject, EM = JsonObject> {
    Success(Success<T, M>),
    Error(Failure<E, EM>),
}

impl<T, E, M, EM> Envelope<T, E, M, EM> {
    pub fn success(message: impl Into<String>, data: T, meta: M) -> Self {
        Self::Success(Success {
            message: message.into(),
            data,
            meta,
        })
    }

    pub fn error(message: impl Into<String>, data: E, meta: EM) -> Self {
        Self::Error(Failure {
            message: message.into(),
            data,
            meta,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(s) => &s.message,
            Self::Error(f) => &f.message,
        }
    }

    pub fn as_success(&self) -> Option<&Success<T, M>> {
        match self {
            Self::Success(s) => Some(s),
            Self::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&Failure<E, EM>> {
        match self {
            Self::Success(_) => None,
            Self::Error(f) => Some(f),
        }
    }

    /// Convert into a `Result` so callers can use `?` on the success path.
    pub fn into_result(self) -> Result<Success<T, M>, Failure<E, EM>> {
        match self {
            Self::Success(s) => Ok(s),
            Self::Error(f) => Err(f),
        }
    }
}

impl<T, E, M, EM> Envelope<T, E, StatusMeta<M>, StatusMeta<EM>> {
    /// Transport status recorded in `meta` (0 when no response was received).
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(s) => s.meta.status,
            Self::Error(f) => f.meta.status,
        }
    }

    pub fn status_text(&self) -> &str {
        match self {
            Self::Success(s) => &s.meta.status_text,
            Self::Error(f) => &f.meta.status_text,
        }
    }
}

#[derive(Serialize)]
struct WireRef<'a, D, M> {
    success: bool,
    message: &'a str,
    data: &'a D,
    meta: &'a M,
}

impl<T, E, M, EM> Serialize for Envelope<T, E, M, EM>
where
    T: Serialize,
    E: Serialize,
    M: Serialize,
    EM: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(s) => WireRef {
                success: true,
                message: &s.message,
                data: &s.data,
                meta: &s.meta,
            }
            .serialize(serializer),
            Self::Error(f) => WireRef {
                success: false,
                message: &f.message,
                data: &f.data,
                meta: &f.meta,
            }
            .serialize(serializer),
        }
    }
}

impl<'de, T, E, M, EM> Deserialize<'de> for Envelope<T, E, M, EM>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
    M: DeserializeOwned,
    EM: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = JsonObject::deserialize(deserializer)?;
        let success = match fields.remove("success") {
            Some(Value::Bool(flag)) => flag,
            Some(_) => return Err(D::Error::custom("`success` must be a boolean")),
            None => return Err(D::Error::missing_field("success")),
        };

        let rest = Value::Object(fields);
        if success {
            serde_json::from_value(rest)
                .map(Self::Success)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(rest)
                .map(Self::Error)
                .map_err(D::Error::custom)
        }
    }
}

/// Facts known only to the HTTP layer. They win over any `meta` field of the
/// same name supplied by a handler or carried in a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFacts {
    pub status: u16,
    pub status_text: String,
}

impl TransportFacts {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
        }
    }

    /// Facts used when no response was received at all.
    pub fn unknown() -> Self {
        Self::new(0, "Unknown error")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `meta` with transport facts attached. Any extra metadata is flattened
/// alongside `status` / `statusText`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMeta<M = JsonObject> {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(flatten)]
    pub extra: M,
}

impl<M: Default> StatusMeta<M> {
    pub fn from_facts(facts: &TransportFacts) -> Self {
        Self {
            status: facts.status,
            status_text: facts.status_text.clone(),
            extra: M::default(),
        }
    }
}

/// Build a complete envelope object from a (possibly partial) body.
///
/// Defaults are laid down first (`success: success_default`, `message: ""`,
/// `data: {}`, `meta: {}`), every key the body supplies is overlaid on top,
/// and finally `status` / `statusText` from `facts` are written into `meta`.
///
/// A non-object body becomes the `data` payload; `null` keeps the defaults.
pub fn merge_envelope(body: Value, success_default: bool, facts: &TransportFacts) -> Value {
    let mut merged = JsonObject::new();
    merged.insert("success".into(), Value::Bool(success_default));
    merged.insert("message".into(), Value::String(String::new()));
    merged.insert("data".into(), Value::Object(JsonObject::new()));
    merged.insert("meta".into(), Value::Object(JsonObject::new()));

    match body {
        Value::Object(fields) => merged.extend(fields),
        Value::Null => {}
        other => {
            merged.insert("data".into(), other);
        }
    }

    let mut meta = match merged.remove("meta") {
        Some(Value::Object(meta)) => meta,
        _ => JsonObject::new(),
    };
    meta.insert(META_STATUS.into(), Value::from(facts.status));
    meta.insert(
        META_STATUS_TEXT.into(),
        Value::String(facts.status_text.clone()),
    );
    merged.insert("meta".into(), Value::Object(meta));

    Value::Object(merged)
}
