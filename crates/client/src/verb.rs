//! HTTP verbs and verb-restricted views of a client.

use std::fmt;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::config::RequestConfig;
use crate::normalize::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Verb {
    pub const ALL: [Verb; 7] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Head,
        Verb::Options,
    ];

    /// Whether calls with this verb send a request body.
    pub fn carries_body(self) -> bool {
        matches!(self, Verb::Post | Verb::Put | Verb::Patch)
    }

    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
            Verb::Head => Method::HEAD,
            Verb::Options => Method::OPTIONS,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// One verb bound to a client.
#[derive(Debug, Clone)]
pub struct VerbCaller {
    client: ApiClient,
    verb: Verb,
}

impl VerbCaller {
    pub fn new(client: ApiClient, verb: Verb) -> Self {
        Self { client, verb }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Issue the call. `body` is ignored for verbs that carry none.
    pub async fn send<B, T, E, M, EM>(
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
        let body = if self.verb.carries_body() { body } else { None };
        self.client.request(self.verb, url, body, config).await
    }
}

/// A projection of a client onto a subset of verbs.
#[derive(Debug, Clone)]
pub struct Verbs {
    callers: Vec<VerbCaller>,
}

impl Verbs {
    pub(crate) fn new(client: &ApiClient, verbs: &[Verb]) -> Self {
        let mut callers: Vec<VerbCaller> = Vec::with_capacity(verbs.len());
        for &verb in verbs {
            if !callers.iter().any(|c| c.verb == verb) {
                callers.push(VerbCaller::new(client.clone(), verb));
            }
        }
        Self { callers }
    }

    /// The caller for `verb`, or `None` when it was not requested.
    pub fn verb(&self, verb: Verb) -> Option<&VerbCaller> {
        self.callers.iter().find(|c| c.verb == verb)
    }

    pub fn allowed(&self) -> impl Iterator<Item = Verb> + '_ {
        self.callers.iter().map(|c| c.verb)
    }
}
