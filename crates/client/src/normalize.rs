//! Turning whatever came back over the wire into an envelope.
//!
//! Uses the same [`merge_envelope`] routine as the server, so the transport
//! facts (`status`, `statusText`) always win over anything the body carried.

use aiview_core::envelope::{merge_envelope, Envelope, StatusMeta, TransportFacts};
use aiview_core::types::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Message of the envelope synthesized when no usable response exists.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Something went wrong";

/// What every call resolves to. `T`/`E` are the success/error payloads and
/// `M`/`EM` the success/error metadata extensions.
pub type ApiResponse<T = Value, E = Value, M = JsonObject, EM = JsonObject> =
    Envelope<T, E, StatusMeta<M>, StatusMeta<EM>>;

/// The generic error envelope: `success: false`, fixed message, empty data,
/// `meta: {status: 0, statusText: "Unknown error"}`.
pub fn unknown_error<T, E, M, EM>() -> ApiResponse<T, E, M, EM>
where
    E: DeserializeOwned + Default,
    EM: Default,
{
    let data = serde_json::from_value(Value::Object(JsonObject::new())).unwrap_or_default();
    Envelope::error(
        UNKNOWN_ERROR_MESSAGE,
        data,
        StatusMeta::from_facts(&TransportFacts::unknown()),
    )
}

/// Build an envelope from a received response.
///
/// An empty body is treated as `{}`. `success` defaults to whether the status
/// is 2xx, and a non-2xx status always yields the error variant. A body that
/// is not a JSON object, or that does not fit the requested types, yields
/// [`unknown_error`].
pub fn normalize_response<T, E, M, EM>(facts: &TransportFacts, bytes: &[u8]) -> ApiResponse<T, E, M, EM>
where
    T: DeserializeOwned,
    E: DeserializeOwned + Default,
    M: DeserializeOwned,
    EM: DeserializeOwned + Default,
{
    match try_normalize(facts, bytes) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::debug!(status = facts.status, error = %err, "Discarding unusable response body");
            unknown_error()
        }
    }
}

fn try_normalize<T, E, M, EM>(
    facts: &TransportFacts,
    bytes: &[u8],
) -> Result<ApiResponse<T, E, M, EM>, ClientError>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
    M: DeserializeOwned,
    EM: DeserializeOwned,
{
    let body = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(JsonObject::new())
    } else {
        serde_json::from_slice(bytes)?
    };

    if !body.is_object() {
        return Err(ClientError::NotAnEnvelope {
            status: facts.status,
            reason: "body is not a JSON object".into(),
        });
    }

    let mut merged = merge_envelope(body, facts.is_success(), facts);
    if !facts.is_success() {
        merged["success"] = Value::Bool(false);
    }

    serde_json::from_value(merged).map_err(|e| ClientError::NotAnEnvelope {
        status: facts.status,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    fn facts(status: u16, text: &str) -> TransportFacts {
        TransportFacts::new(status, text)
    }

    fn normalize(status: u16, text: &str, body: &str) -> ApiResponse {
        normalize_response(&facts(status, text), body.as_bytes())
    }

    #[test]
    fn unknown_error_has_fixed_shape() {
        let envelope: ApiResponse = unknown_error();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "message": "Something went wrong",
                "data": {},
                "meta": {"status": 0, "statusText": "Unknown error"}
            })
        );
    }

    #[test]
    fn error_body_is_kept_with_transport_status() {
        let envelope = normalize(
            422,
            "Unprocessable Entity",
            r#"{"success":false,"message":"Invalid data found","data":{"title":"Title is too long"}}"#,
        );
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "message": "Invalid data found",
                "data": {"title": "Title is too long"},
                "meta": {"status": 422, "statusText": "Unprocessable Entity"}
            })
        );
    }

    #[test]
    fn body_status_never_overrides_transport() {
        let envelope = normalize(
            200,
            "OK",
            r#"{"success":true,"data":1,"meta":{"status":503,"statusText":"nope"}}"#,
        );
        assert_eq!(envelope.status(), 200);
        assert_eq!(envelope.status_text(), "OK");
    }

    #[test]
    fn partial_body_gets_defaults() {
        let envelope = normalize(201, "Created", r#"{"data":{"id":"abc"}}"#);
        assert_matches!(envelope, Envelope::Success(ref s) if s.message.is_empty() && s.data["id"] == "abc");
    }

    #[test]
    fn empty_body_is_a_partial_envelope() {
        let envelope = normalize(204, "No Content", "");
        assert!(envelope.is_success());
        assert_eq!(envelope.status(), 204);
    }

    #[test]
    fn non_success_status_forces_error_variant() {
        let envelope = normalize(500, "Internal Server Error", r#"{"success":true,"data":{}}"#);
        assert!(!envelope.is_success());
        assert_eq!(envelope.status(), 500);
    }

    #[test]
    fn non_object_bodies_are_unknown_errors() {
        for body in ["<html>oops</html>", "[1,2]", "\"text\"", "null"] {
            let envelope = normalize(200, "OK", body);
            assert_eq!(envelope.status(), 0, "body {body}");
            assert_eq!(envelope.message(), UNKNOWN_ERROR_MESSAGE);
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Token {
        token: String,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Page {
        page: u32,
    }

    #[test]
    fn typed_payload_and_meta_are_decoded() {
        let envelope: ApiResponse<Token, Value, Page> = normalize_response(
            &facts(200, "OK"),
            br#"{"success":true,"data":{"token":"t-1"},"meta":{"page":2}}"#,
        );
        let success = envelope.into_result().unwrap();
        assert_eq!(success.data, Token { token: "t-1".into() });
        assert_eq!(success.meta.extra, Page { page: 2 });
        assert_eq!(success.meta.status, 200);
    }

    #[test]
    fn payload_of_the_wrong_type_is_unknown_error() {
        let envelope: ApiResponse<Token> =
            normalize_response(&facts(200, "OK"), br#"{"success":true,"data":[1,2]}"#);
        assert_eq!(envelope.status(), 0);
    }
}
