pub mod diagnostics;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /diagnostics/echo              POST  validate + echo one message
/// /diagnostics/echo/batch        POST  validate + echo a list
/// /diagnostics/echo/schema       GET   echo schema descriptor
/// /diagnostics/items/{id}        GET   object id guard
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/diagnostics", diagnostics::router())
}
