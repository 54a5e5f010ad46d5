/// Errors from the client layer.
///
/// Calls never return these; they are logged and folded into the generic
/// error envelope. They surface directly only from client construction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body was JSON but not an envelope of the requested shape.
    #[error("Response body is not an envelope ({status}): {reason}")]
    NotAnEnvelope {
        /// HTTP status code.
        status: u16,
        reason: String,
    },

    /// A configuration variable is set but cannot be parsed.
    #[error("{var} must be a valid {expected}, got {value:?}")]
    Config {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}
