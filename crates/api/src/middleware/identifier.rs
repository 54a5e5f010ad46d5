//! Path identifier guard.
//!
//! Rejects requests whose identifier path parameter is missing or not a
//! 24-character hexadecimal object id, before any handler runs. Attach with
//! `route_layer` so path parameters are already matched:
//!
//! ```ignore
//! Router::new()
//!     .route("/rounds/{id}", get(show_round))
//!     .route_layer(axum::middleware::from_fn(require_object_id("id")));
//! ```

use aiview_core::identifier::is_object_id;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};

use crate::error::AppError;

pub const MISSING_ID_MESSAGE: &str = "Please provide UID.";
pub const INVALID_ID_MESSAGE: &str = "Please provide valid UID.";

/// Middleware requiring path parameter `param` to be a valid object id.
///
/// Only the path parameters are inspected; the request (body included) is
/// forwarded as received.
pub fn require_object_id(
    param: &'static str,
) -> impl Fn(Request, Next) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
    move |request: Request, next: Next| {
        async move {
            let (mut parts, body) = request.into_parts();
            let id = RawPathParams::from_request_parts(&mut parts, &())
                .await
                .ok()
                .and_then(|params| {
                    params
                        .iter()
                        .find_map(|(name, value)| (name == param).then(|| value.to_string()))
                })
                .unwrap_or_default();

            if id.is_empty() {
                return AppError::NotFound(MISSING_ID_MESSAGE.into()).into_response();
            }
            if !is_object_id(&id) {
                tracing::debug!(param, id = %id, "Rejected malformed identifier");
                return AppError::NotFound(INVALID_ID_MESSAGE.into()).into_response();
            }
            next.run(Request::from_parts(parts, body)).await
        }
        .boxed()
    }
}
