//! Diagnostic endpoints for exercising the request/response contract end to
//! end: object and array validation, the identifier guard, and publication of
//! a schema descriptor.
//!
//! | Method | Path               | Description                              |
//! |--------|--------------------|------------------------------------------|
//! | POST   | `/echo`            | Validate one message and echo it back    |
//! | POST   | `/echo/batch`      | Validate a list of messages              |
//! | GET    | `/echo/schema`     | The echo request schema as JSON          |
//! | GET    | `/items/{id}`      | Echo a validated object id               |

use aiview_core::validation::{FieldSpec, ObjectSchema, Schema};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::identifier::{require_object_id, MISSING_ID_MESSAGE};
use crate::response::Reply;
use crate::state::AppState;
use crate::template::{without_schema, ApiRequest, ResponseTemplate};

pub const MESSAGE_MAX_LEN: usize = 500;
pub const MAX_TAGS: usize = 10;

/// Body of `POST /echo`, after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub priority: i64,
}

/// Schema for one echo message.
pub fn echo_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(
            "message",
            FieldSpec::string()
                .min_len(1)
                .message("Message cannot be empty")
                .max_len(MESSAGE_MAX_LEN)
                .message("Message is too long")
                .describe("Text echoed back to the caller"),
        )
        .field(
            "tags",
            FieldSpec::array(FieldSpec::string().min_len(1).max_len(32))
                .max_len(MAX_TAGS)
                .optional()
                .describe("Free-form labels"),
        )
        .field(
            "priority",
            FieldSpec::integer()
                .min(1.0)
                .max(5.0)
                .default_value(3)
                .describe("1 (lowest) to 5 (highest)"),
        )
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    count: usize,
    items: Vec<EchoRequest>,
}

/// Mount diagnostic routes.
pub fn router() -> Router<AppState> {
    let echo = ResponseTemplate::<EchoRequest>::with_schema(echo_schema());
    let batch = ResponseTemplate::<Vec<EchoRequest>>::with_schema(echo_schema().array());

    let items = Router::new()
        .route("/items/{id}", get(without_schema(show_item)))
        .route_layer(from_fn(require_object_id("id")));

    Router::new()
        .route("/echo", post(echo.handler(echo_one)))
        .route("/echo/batch", post(batch.handler(echo_batch)))
        .route("/echo/schema", get(without_schema(echo_schema_descriptor)))
        .merge(items)
}

async fn echo_one(req: ApiRequest<EchoRequest>) -> Reply<EchoRequest> {
    tracing::debug!(priority = req.body.priority, "Echoing message");
    Reply::ok(req.body).message("Echo")
}

async fn echo_batch(req: ApiRequest<Vec<EchoRequest>>) -> Reply<BatchSummary> {
    let items = req.body;
    Reply::ok(BatchSummary {
        count: items.len(),
        items,
    })
    .message("Echo")
}

async fn echo_schema_descriptor(_req: ApiRequest) -> AppResult<Reply> {
    let descriptor = serde_json::to_value(Schema::from(echo_schema()))
        .map_err(|e| AppError::InternalError(format!("failed to encode schema: {e}")))?;
    Ok(Reply::ok(descriptor))
}

async fn show_item(mut req: ApiRequest) -> AppResult<Reply> {
    let id = req
        .path_param("id")
        .await
        .ok_or_else(|| AppError::NotFound(MISSING_ID_MESSAGE.into()))?;
    Ok(Reply::ok(json!({ "id": id })).meta("resource", "item"))
}
