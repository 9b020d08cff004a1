//! reqwest implementation of the REST seams.

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{CatalogSource, RemoteError, RemoteSource};
use crate::catalog::CatalogKind;
use crate::entity::Entity;

/// Timeout for the reachability probe.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for the tablekeep API.
///
/// One instance serves every entity kind and every catalog. Timeouts and
/// retries are the transport's business, configured here and invisible to the
/// sync layer.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    /// `None` in offline mode: every call fails fast with `Unreachable`.
    base_url: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(normalize_base_url(&base_url.into())),
            api_key: None,
            client: Client::new(),
        }
    }

    /// A client that never touches the network.
    pub fn offline() -> Self {
        Self {
            base_url: None,
            api_key: None,
            client: Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Applies a per-request timeout. Keeps the previous client if the
    /// builder rejects the configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => tracing::warn!("Ignoring request timeout, client build failed: {}", e),
        }
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn is_offline(&self) -> bool {
        self.base_url.is_none()
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded,
    /// so an id can never add path components, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| RemoteError::Unreachable("offline mode".to_string()))?;
        let mut url = Url::parse(base)
            .map_err(|e| RemoteError::Unreachable(format!("invalid server URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::Unreachable(format!("invalid server URL {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, RemoteError> {
        let mut builder = self.client.request(method, self.url(segments)?);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        Ok(builder)
    }

    async fn get_json<B: DeserializeOwned>(&self, segments: &[&str]) -> Result<B, RemoteError> {
        let response = execute(self.request(Method::GET, segments)?).await?;
        decode(response).await
    }

    async fn send_json<P, B>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &P,
    ) -> Result<B, RemoteError>
    where
        P: Serialize + ?Sized,
        B: DeserializeOwned,
    {
        let response = execute(self.request(method, segments)?.json(payload)).await?;
        decode(response).await
    }
}

/// Adds a scheme when missing and strips trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

async fn execute(request: RequestBuilder) -> Result<Response, RemoteError> {
    let response = request
        .send()
        .await
        .map_err(|e| RemoteError::Unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }
    Ok(response)
}

async fn decode<B: DeserializeOwned>(response: Response) -> Result<B, RemoteError> {
    let status = response.status().as_u16();
    response
        .json::<B>()
        .await
        .map_err(|e| RemoteError::Malformed {
            status,
            reason: e.to_string(),
        })
}

impl<T: Entity> RemoteSource<T> for HttpRemote {
    async fn list(&self) -> Result<Vec<T>, RemoteError> {
        self.get_json(&[T::COLLECTION]).await
    }

    async fn get_by_id(&self, id: &str) -> Result<T, RemoteError> {
        self.get_json(&[T::COLLECTION, id]).await
    }

    async fn create(&self, payload: &T::Patch) -> Result<T, RemoteError> {
        self.send_json(Method::POST, &[T::COLLECTION], payload).await
    }

    async fn update(&self, id: &str, payload: &T) -> Result<T, RemoteError> {
        self.send_json(Method::PUT, &[T::COLLECTION, id], payload)
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let request = self.request(Method::DELETE, &[T::COLLECTION, id])?;
        execute(request).await?;
        Ok(())
    }
}

impl CatalogSource for HttpRemote {
    async fn fetch_catalog(&self, kind: CatalogKind) -> Result<Vec<Value>, RemoteError> {
        self.get_json(&[kind.path()]).await
    }
}

/// Returns true if `GET {url}/health` answers with a success status within a
/// few seconds.
pub async fn check_server(url: &str) -> bool {
    let client = match Client::builder().timeout(HEALTH_TIMEOUT).build() {
        Ok(client) => client,
        Err(_) => return false,
    };

    let health_url = format!("{}/health", normalize_base_url(url));
    match client.get(&health_url).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::debug!("Health check against {} failed: {}", health_url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InventoryItem;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/"),
            "http://localhost:8080"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com"),
            "https://api.example.com"
        );
        assert_eq!(normalize_base_url("localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_url_joins_collection() {
        let remote = HttpRemote::new("http://localhost:8080/");
        assert_eq!(
            remote.url(&["purchase-orders", "abc"]).unwrap().as_str(),
            "http://localhost:8080/purchase-orders/abc"
        );

        let prefixed = HttpRemote::new("http://localhost:8080/api/");
        assert_eq!(
            prefixed.url(&["menus"]).unwrap().as_str(),
            "http://localhost:8080/api/menus"
        );
    }

    #[tokio::test]
    async fn test_id_with_reserved_characters_stays_one_segment() {
        let remote = HttpRemote::new("http://localhost:8080");
        let request = remote
            .request(Method::PUT, &["inventory", "a#b/c?d"])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/inventory/a%23b%2Fc%3Fd");
        assert_eq!(request.url().query(), None);
        assert_eq!(request.url().fragment(), None);
        assert_eq!(request.url().path_segments().unwrap().count(), 2);
    }

    #[test]
    fn test_offline_url_is_unreachable() {
        let remote = HttpRemote::offline();
        assert!(remote.is_offline());
        assert!(matches!(
            remote.url(&["inventory"]),
            Err(RemoteError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_list_fails_fast() {
        let remote = HttpRemote::offline();
        let result = <HttpRemote as RemoteSource<InventoryItem>>::list(&remote).await;
        assert!(matches!(result, Err(RemoteError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_check_server_unreachable() {
        // Port 9 (discard) is not expected to run an HTTP server.
        assert!(!check_server("http://127.0.0.1:9").await);
    }

    #[test]
    fn test_remote_error_status() {
        assert_eq!(RemoteError::Status(503).status(), Some(503));
        assert_eq!(RemoteError::Unreachable("x".into()).status(), None);
        assert_eq!(
            RemoteError::Malformed {
                status: 200,
                reason: "eof".into()
            }
            .status(),
            Some(200)
        );
    }
}
