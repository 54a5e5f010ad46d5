//! Declarative request schemas.
//!
//! Schemas are plain data ([`FieldSpec`], [`ObjectSchema`], [`Schema`]);
//! [`evaluator::validate`] is the only code that interprets them. Adding a new
//! constraint means adding a [`Check`] variant and its arm in the evaluator.

pub mod evaluator;
pub mod field_errors;
pub mod rules;
pub mod schema;

pub use evaluator::validate;
pub use field_errors::FieldErrors;
pub use rules::{Check, FieldKind, FieldSpec, Pattern, Rule};
pub use schema::{ObjectSchema, PayloadKind, Schema, SchemaKind};
