//! Request middleware.
//!
//! - [`validate`] -- body parsing and schema validation used by every template.
//! - [`identifier::require_object_id`] -- rejects malformed path identifiers.

pub mod identifier;
pub mod validate;
