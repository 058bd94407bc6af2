//! Resource client trait, HTTP implementation and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::{ResourceKind, ValidationError};
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{CallError, FetchError};

/// Reads one resource named by a locator and decodes it.
///
/// Implementations make a single attempt per call; retry policy belongs to
/// whoever wraps them.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Checks that a locator can be fetched at all, without any I/O.
    fn check_locator(&self, _kind: ResourceKind, _locator: &str) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Fetches the resource at `locator` and decodes it as `T`.
    async fn fetch<T>(&self, kind: ResourceKind, locator: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Send + 'static;
}

/// Resource client that issues a plain `GET` per locator.
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: Client,
    timeout: Duration,
}

impl HttpResourceClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, CallError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("order-service/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CallError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn parse_locator(locator: &str) -> Result<Url, String> {
        let url = Url::parse(locator).map_err(|e| e.to_string())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(format!("unsupported scheme '{other}'")),
        }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    fn check_locator(&self, kind: ResourceKind, locator: &str) -> Result<(), ValidationError> {
        Self::parse_locator(locator)
            .map(|_| ())
            .map_err(|reason| ValidationError::MalformedLocator {
                kind,
                locator: locator.to_string(),
                reason,
            })
    }

    #[tracing::instrument(skip(self))]
    async fn fetch<T>(&self, kind: ResourceKind, locator: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let fail = |cause| FetchError::new(kind, locator, cause);

        let url = Self::parse_locator(locator).map_err(|e| fail(CallError::InvalidTarget(e)))?;
        debug!(%url, "fetching resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(CallError::from_reqwest(e, self.timeout)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "resource fetch rejected");
            return Err(fail(CallError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fail(CallError::from_reqwest(e, self.timeout)))?;
        serde_json::from_slice(&bytes).map_err(|e| fail(CallError::Decode(e.to_string())))
    }
}

#[derive(Debug, Default)]
struct InMemoryResourceState {
    documents: HashMap<String, serde_json::Value>,
    failing: HashMap<String, CallError>,
    latency: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// In-memory resource client for testing.
///
/// Serves JSON documents registered by locator. Unknown locators answer 404.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceClient {
    state: Arc<RwLock<InMemoryResourceState>>,
}

impl InMemoryResourceClient {
    /// Creates a new in-memory resource client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the document served at `locator`.
    pub fn insert(&self, locator: impl Into<String>, document: impl Serialize) {
        let value = serde_json::to_value(document).unwrap();
        self.state
            .write()
            .unwrap()
            .documents
            .insert(locator.into(), value);
    }

    /// Makes every fetch of `locator` fail with `cause`.
    pub fn set_failure(&self, locator: impl Into<String>, cause: CallError) {
        self.state
            .write()
            .unwrap()
            .failing
            .insert(locator.into(), cause);
    }

    /// Delays every fetch of `locator` by `delay` before answering.
    pub fn set_latency(&self, locator: impl Into<String>, delay: Duration) {
        self.state
            .write()
            .unwrap()
            .latency
            .insert(locator.into(), delay);
    }

    /// Returns the number of fetches issued.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }

    /// Returns the locators fetched, in the order the fetches started.
    pub fn calls(&self) -> Vec<String> {
        self.state.read().unwrap().calls.clone()
    }
}

#[async_trait]
impl ResourceClient for InMemoryResourceClient {
    async fn fetch<T>(&self, kind: ResourceKind, locator: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (delay, outcome) = {
            let mut state = self.state.write().unwrap();
            state.calls.push(locator.to_string());
            let outcome = match state.failing.get(locator) {
                Some(cause) => Err(cause.clone()),
                None => state.documents.get(locator).cloned().ok_or(CallError::Status {
                    status: 404,
                    body: "not found".to_string(),
                }),
            };
            (state.latency.get(locator).copied(), outcome)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let document = outcome.map_err(|cause| FetchError::new(kind, locator, cause))?;
        serde_json::from_value(document)
            .map_err(|e| FetchError::new(kind, locator, CallError::Decode(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Address, Item};

    #[tokio::test]
    async fn test_serves_registered_document() {
        let client = InMemoryResourceClient::new();
        client.insert(
            "mem://addresses/1",
            serde_json::json!({"id": "a-1", "city": "Glasgow"}),
        );

        let address: Address = client
            .fetch(ResourceKind::Address, "mem://addresses/1")
            .await
            .unwrap();
        assert_eq!(address.city, "Glasgow");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_locator_is_404() {
        let client = InMemoryResourceClient::new();
        let err = client
            .fetch::<Address>(ResourceKind::Address, "mem://missing")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ResourceKind::Address);
        assert!(matches!(err.cause, CallError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_decode_error() {
        let client = InMemoryResourceClient::new();
        client.insert("mem://items", serde_json::json!({"not": "a list"}));

        let err = client
            .fetch::<Vec<Item>>(ResourceKind::Items, "mem://items")
            .await
            .unwrap_err();
        assert!(matches!(err.cause, CallError::Decode(_)));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let client = InMemoryResourceClient::new();
        client.insert("mem://card", serde_json::json!({"id": "c-1"}));
        client.set_failure("mem://card", CallError::Transport("reset".to_string()));

        let err = client
            .fetch::<domain::Card>(ResourceKind::Card, "mem://card")
            .await
            .unwrap_err();
        assert_eq!(err.cause, CallError::Transport("reset".to_string()));
    }

    #[test]
    fn test_http_locator_check() {
        let client = HttpResourceClient::new(Duration::from_secs(1)).unwrap();
        assert!(
            client
                .check_locator(ResourceKind::Items, "http://cart/carts/1/items")
                .is_ok()
        );
        assert!(
            client
                .check_locator(ResourceKind::Items, "not a url")
                .is_err()
        );
        let err = client
            .check_locator(ResourceKind::Card, "ftp://user/cards/1")
            .unwrap_err();
        assert_eq!(err.kind(), ResourceKind::Card);
    }
}
