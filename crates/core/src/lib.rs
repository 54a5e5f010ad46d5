//! Framework-independent building blocks of the API envelope layer.
//!
//! - [`envelope`] -- the success/error response union and the
//!   default-then-overlay merge shared by server and client.
//! - [`validation`] -- declarative schemas and the validator that interprets them.
//! - [`identifier`] -- identifier format checks for path parameters.
//! - [`error`] -- [`error::CoreError`], the failure taxonomy of this crate.

pub mod envelope;
pub mod error;
pub mod identifier;
pub mod types;
pub mod validation;
