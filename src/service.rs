//! Request execution: cache consult, transport call, decode.
//!
//! [`ApiService`] is the single entry point for talking to the API. Every
//! execution follows the same path: look the URL up in the
//! [`ResponseCache`] first; on a hit decode the cached bytes (a decode
//! failure there is a hard error, never silently treated as a miss); on a
//! miss perform exactly one GET through the [`Transport`], populate the cache
//! best-effort, and decode.
//!
//! The transport is a trait seam so the whole stack above it — service,
//! aggregator, controller — runs against a canned in-process transport in
//! tests. No retries and no custom timeout policy beyond the client default:
//! a failed call surfaces as a [`ServiceError`] value to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::request::ApiRequest;

/// Failure modes of one request execution.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The given URL does not parse into a recognized API request.
    #[error("not a recognized API request: {0}")]
    InvalidRequestType(String),
    /// The request's URL could not be turned into a transport request.
    #[error("failed to construct transport request for {0}")]
    RequestConstruction(String),
    /// Network or HTTP-level failure (includes non-2xx statuses).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response bytes (fresh or cached) did not match the expected shape.
    #[error("response body did not match the expected shape")]
    Decode(#[source] serde_json::Error),
}

/// One-shot GET transport. Implementations perform exactly one attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the raw response body for an absolute URL.
    async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}

/// reqwest-backed transport used outside of tests.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|_| ServiceError::RequestConstruction(url.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Transport(format!(
                "HTTP {} for {}",
                status, url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Cache-first API request executor, shared across controllers.
pub struct ApiService {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
}

impl ApiService {
    /// Service backed by a real HTTP transport and a fresh session cache.
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(timeout)?),
            cache: Arc::new(ResponseCache::new()),
        })
    }

    /// Service with an explicit transport and cache. This is the seam the
    /// tests use; it is also how multiple services could share one cache.
    pub fn with_transport(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    /// The session cache this service populates.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Execute a request and decode the body as `T` (an envelope for
    /// collection requests, a bare record for resource requests).
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ServiceError> {
        let url = request.url();

        if let Some(bytes) = self.cache.get(request.endpoint(), &url) {
            debug!(%url, "cache hit");
            // Cached bytes that fail to decode are a hard error, not a miss.
            return serde_json::from_slice(&bytes).map_err(ServiceError::Decode);
        }

        debug!(%url, "cache miss, fetching");
        let bytes = self.transport.get(&url).await?;

        // Best-effort: a failed cache write never fails the fetch.
        self.cache.set(request.endpoint(), &url, bytes.clone());

        serde_json::from_slice(&bytes).map_err(ServiceError::Decode)
    }

    /// Execute an arbitrary URL string — a page cursor or a record's
    /// cross-reference. URLs that do not parse into a recognized request are
    /// rejected with [`ServiceError::InvalidRequestType`].
    pub async fn execute_url<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let request = ApiRequest::parse(url)
            .ok_or_else(|| ServiceError::InvalidRequestType(url.to_string()))?;
        self.execute(&request).await
    }
}
