//! HTTP client for the aiview API.
//!
//! Wraps [`reqwest`] and resolves every call to an [`ApiResponse`]. Payload
//! and metadata types are chosen at the call site through the annotated
//! result type:
//!
//! ```ignore
//! let res: ApiResponse<Round> = client.get("/rounds/507f1f77bcf86cd799439011", &RequestConfig::new()).await;
//! match res.into_result() {
//!     Ok(ok) => println!("round {}", ok.data.title),
//!     Err(err) => eprintln!("{} ({})", err.message, err.meta.status),
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use aiview_core::envelope::TransportFacts;

use crate::config::{ClientConfig, RequestConfig};
use crate::error::ClientError;
use crate::normalize::{normalize_response, unknown_error, ApiResponse};
use crate::verb::{Verb, Verbs};

/// Typed caller bound to an optional base URL. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl ApiClient {
    /// Create a client resolving relative URLs against `base_url`,
    /// e.g. `http://host:3000/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), Some(base_url.into()))
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across multiple callers).
    pub fn with_client(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.base_url.clone()))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Restrict the exposed surface to `verbs`, or expose every verb when
    /// `None`. Per-verb behavior is unchanged.
    pub fn call(&self, verbs: Option<&[Verb]>) -> Verbs {
        Verbs::new(self, verbs.unwrap_or(&Verb::ALL))
    }

    pub async fn get<T, E, M, EM>(&self, url: &str, config: &RequestConfig) -> ApiResponse<T, E, M, EM>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request::<(), _, _, _, _>(Verb::Get, url, None, config).await
    }

    pub async fn delete<T, E, M, EM>(&self, url: &str, config: &RequestConfig) -> ApiResponse<T, E, M, EM>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request::<(), _, _, _, _>(Verb::Delete, url, None, config).await
    }

    pub async fn head<T, E, M, EM>(&self, url: &str, config: &RequestConfig) -> ApiResponse<T, E, M, EM>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request::<(), _, _, _, _>(Verb::Head, url, None, config).await
    }

    pub async fn options<T, E, M, EM>(&self, url: &str, config: &RequestConfig) -> ApiResponse<T, E, M, EM>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request::<(), _, _, _, _>(Verb::Options, url, None, config).await
    }

    /// `POST` with an optional JSON body. Pass `None::<&()>` for no body.
    pub async fn post<B, T, E, M, EM>(
        &self,
        url: &str,
        body: Option<&B>,
        config: &RequestConfig,
    ) -> ApiResponse<T, E, M, EM>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request(Verb::Post, url, body, config).await
    }

    pub async fn put<B, T, E, M, EM>(
        &self,
        url: &str,
        body: Option<&B>,
        config: &RequestConfig,
    ) -> ApiResponse<T, E, M, EM>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request(Verb::Put, url, body, config).await
    }

    pub async fn patch<B, T, E, M, EM>(
        &self,
        url: &str,
        body: Option<&B>,
        config: &RequestConfig,
    ) -> ApiResponse<T, E, M, EM>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        self.request(Verb::Patch, url, body, config).await
    }

    /// Issue one call and normalize the outcome. Never fails.
    pub async fn request<B, T, E, M, EM>(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&B>,
        config: &RequestConfig,
    ) -> ApiResponse<T, E, M, EM>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        E: DeserializeOwned + Default,
        M: DeserializeOwned,
        EM: DeserializeOwned + Default,
    {
        let url = self.resolve(url);
        match self.send(verb, &url, body, config).await {
            Ok((facts, bytes)) => normalize_response(&facts, &bytes),
            Err(err) => {
                tracing::warn!(verb = %verb, url = %url, error = %err, "API call failed");
                unknown_error()
            }
        }
    }

    // ---- private helpers ----

    async fn send<B: Serialize + ?Sized>(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&B>,
        config: &RequestConfig,
    ) -> Result<(TransportFacts, Vec<u8>), ClientError> {
        let mut request = self.client.request(verb.method(), url);
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            request = request.query(&config.query);
        }
        if let Some(token) = &config.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body.filter(|_| verb.carries_body()) {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let facts = TransportFacts::new(status.as_u16(), status.canonical_reason().unwrap_or_default());
        let bytes = response.bytes().await?.to_vec();
        Ok((facts, bytes))
    }

    /// Absolute URLs are used as-is; anything else is joined onto the base.
    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/')),
            None => url.to_string(),
        }
    }
}
