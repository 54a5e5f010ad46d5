use crate::validation::{FieldErrors, PayloadKind, SchemaKind};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The payload's structural kind does not match the schema's kind.
    #[error("Unsupported payload: expected {expected}, found {found}")]
    UnsupportedPayload {
        expected: SchemaKind,
        found: PayloadKind,
    },

    /// One or more fields violate their declared constraints.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The schema itself could not be evaluated (e.g. an invalid pattern).
    #[error("Schema error: {0}")]
    Schema(String),
}
