//! Response templates: the only way handlers are attached to routes.
//!
//! A template owns an optional request [`Schema`]. Wrapping a handler (or a
//! middleware) with it yields something axum can route to, where
//!
//! 1. the body is read and parsed as JSON,
//! 2. if a schema is present the body is validated and pruned, and the
//!    handler is skipped entirely on failure,
//! 3. whatever the handler returns is run through the envelope merge
//!    exactly once before being sent.
//!
//! ```ignore
//! let create = ResponseTemplate::<NewRound>::with_schema(round_schema());
//! Router::new().route("/rounds", post(create.handler(|req: ApiRequest<NewRound>| async move {
//!     Reply::created(start_round(req.body))
//! })));
//! ```
//!
//! Templates hold no per-request state and can be cloned and shared across
//! routes freely.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use aiview_core::error::CoreError;
use aiview_core::validation::Schema;
use axum::body::Body;
use axum::extract::{FromRequestParts, RawPathParams, Request};
use axum::http::header::CONTENT_LENGTH;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::validate::{read_body, validate_request_body};
use crate::response::IntoOutgoing;

/// A request whose body has already been parsed (and validated, when the
/// template carries a schema).
#[derive(Debug)]
pub struct ApiRequest<B = Value> {
    pub parts: Parts,
    pub body: B,
}

impl<B> ApiRequest<B> {
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All path parameters of the matched route, in declaration order.
    pub async fn path_params(&mut self) -> Vec<(String, String)> {
        match RawPathParams::from_request_parts(&mut self.parts, &()).await {
            Ok(params) => params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// A single path parameter, `None` when the route does not declare it.
    pub async fn path_param(&mut self, name: &str) -> Option<String> {
        self.path_params()
            .await
            .into_iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    pub fn map_body<C>(self, f: impl FnOnce(B) -> C) -> ApiRequest<C> {
        ApiRequest {
            parts: self.parts,
            body: f(self.body),
        }
    }
}

impl<B: Serialize> ApiRequest<B> {
    /// Rebuild a plain request so it can be forwarded with [`Next::run`].
    /// The body is the (pruned) parsed body, re-encoded as JSON.
    pub fn into_request(self) -> AppResult<Request> {
        let value = serde_json::to_value(&self.body)
            .map_err(|e| AppError::InternalError(format!("failed to re-encode request body: {e}")))?;
        let bytes = match value {
            Value::Null => Vec::new(),
            value => serde_json::to_vec(&value).map_err(|e| {
                AppError::InternalError(format!("failed to re-encode request body: {e}"))
            })?,
        };

        let mut parts = self.parts;
        parts
            .headers
            .insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
        Ok(Request::from_parts(parts, Body::from(bytes)))
    }
}

/// Reusable wrapper binding an optional request schema to handlers.
///
/// `B` is the type the (validated) body is deserialized into.
pub struct ResponseTemplate<B = Value> {
    schema: Option<Arc<Schema>>,
    _body: PhantomData<fn() -> B>,
}

impl<B> Clone for ResponseTemplate<B> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            _body: PhantomData,
        }
    }
}

impl ResponseTemplate<Value> {
    /// No validation: the handler receives the parsed JSON body as-is.
    pub fn without_schema() -> Self {
        Self {
            schema: None,
            _body: PhantomData,
        }
    }
}

impl<B> ResponseTemplate<B>
where
    B: DeserializeOwned + Send + 'static,
{
    /// Validate every request against `schema` before the handler runs.
    pub fn with_schema(schema: impl Into<Schema>) -> Self {
        Self {
            schema: Some(Arc::new(schema.into())),
            _body: PhantomData,
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Wrap an endpoint handler.
    pub fn handler<H, Fut, R>(
        &self,
        handler: H,
    ) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
    where
        H: Fn(ApiRequest<B>) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutgoing + 'static,
    {
        let schema = self.schema.clone();
        move |request: Request| {
            let schema = schema.clone();
            let handler = handler.clone();
            async move {
                let outgoing = match prepare::<B>(schema.as_deref(), request).await {
                    Ok(request) => handler(request).await.into_outgoing(),
                    Err(err) => err.into_outgoing(),
                };
                outgoing.into_response()
            }
            .boxed()
        }
    }

    /// Wrap a middleware for use with [`axum::middleware::from_fn`].
    ///
    /// The middleware may forward with `next.run(req.into_request()?)`, in
    /// which case the downstream response is passed through untouched, or
    /// short-circuit with an error that is emitted as an envelope.
    ///
    /// The forwarded body is the parsed (and pruned) JSON, re-encoded. Guards
    /// that only look at the URI or headers should be plain `from_fn`
    /// functions so the original body passes through byte for byte.
    pub fn middleware<H, Fut, R>(
        &self,
        handler: H,
    ) -> impl Fn(Request, Next) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
    where
        H: Fn(ApiRequest<B>, Next) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, R>> + Send + 'static,
        R: IntoOutgoing + 'static,
    {
        let schema = self.schema.clone();
        move |request: Request, next: Next| {
            let schema = schema.clone();
            let handler = handler.clone();
            async move {
                match prepare::<B>(schema.as_deref(), request).await {
                    Ok(request) => match handler(request, next).await {
                        Ok(response) => response,
                        Err(err) => err.into_outgoing().into_response(),
                    },
                    Err(err) => err.into_outgoing().into_response(),
                }
            }
            .boxed()
        }
    }
}

/// Attach `handler` behind request validation against `schema`.
pub fn with_schema<B, H, Fut, R>(
    schema: impl Into<Schema>,
    handler: H,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    B: DeserializeOwned + Send + 'static,
    H: Fn(ApiRequest<B>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutgoing + 'static,
{
    ResponseTemplate::<B>::with_schema(schema).handler(handler)
}

/// Attach `handler` without request validation.
pub fn without_schema<H, Fut, R>(
    handler: H,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    H: Fn(ApiRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutgoing + 'static,
{
    ResponseTemplate::without_schema().handler(handler)
}

async fn prepare<B: DeserializeOwned>(
    schema: Option<&Schema>,
    request: Request,
) -> AppResult<ApiRequest<B>> {
    let (parts, body) = request.into_parts();
    let bytes = read_body(body).await?;
    let payload = validate_request_body(schema, &bytes)?;
    let body = serde_json::from_value(payload).map_err(|e| {
        CoreError::Schema(format!("validated body does not match the handler's type: {e}"))
    })?;

    tracing::debug!(method = %parts.method, uri = %parts.uri, "Dispatching request");
    Ok(ApiRequest { parts, body })
}
