use super::TransportError;
use crate::config::ClientConfig;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// Minimal JSON-over-HTTP client for the REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(TransportError::from)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.rest_base_url(),
            config.api_key.clone(),
            config.http_timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(TransportError::from)?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let req = self.client.post(url).json(body);
        self.send(path, req).await
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let req = self.client.get(url);
        self.send(path, req).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut req: reqwest::RequestBuilder,
    ) -> Result<T> {
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let start = Instant::now();
        let resp = req.send().await.map_err(TransportError::Http)?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            info!(
                http_status = status.as_u16(),
                endpoint,
                duration_ms = start.elapsed().as_millis() as u64,
                "xai-sdk request failed"
            );
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await.map_err(TransportError::Http)?;
        debug!(
            http_status = status.as_u16(),
            endpoint,
            bytes = bytes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "xai-sdk request completed"
        );
        Ok(serde_json::from_slice(&bytes)?)
    }
}
