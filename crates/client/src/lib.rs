//! Typed caller for the aiview HTTP API.
//!
//! Every call resolves to an [`ApiResponse`] envelope and never fails:
//! transport errors and unusable bodies become a generic error envelope
//! with `meta.status == 0`.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod verb;

pub use client::ApiClient;
pub use config::{ClientConfig, RequestConfig};
pub use error::ClientError;
pub use normalize::{ApiResponse, UNKNOWN_ERROR_MESSAGE};
pub use verb::{Verb, VerbCaller, Verbs};
