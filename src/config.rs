//! Client configuration with environment overrides.
//!
//! Recognized variables:
//! - `XAI_API_KEY` bearer token passed through to the transports
//! - `XAI_API_HOST` API host (default `api.x.ai`)
//! - `XAI_HTTP_TIMEOUT_SECS` REST request timeout (default 60)
//! - `XAI_POLL_TIMEOUT_SECS` / `XAI_POLL_INTERVAL_MS` deferred polling defaults
//! - `XAI_UPLOAD_FRAME_BYTES` upload frame cap (default 3 MiB)
//! - `XAI_UPLOAD_BATCH_SIZE` concurrent uploads in a batch (default 5)

use crate::deferred::timer::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
use crate::files::chunking::DEFAULT_FRAME_SIZE;
use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "api.x.ai";
pub const DEFAULT_BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub api_host: String,
    pub http_timeout: Duration,
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
    pub upload_frame_size: usize,
    pub upload_batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: DEFAULT_API_HOST.to_string(),
            http_timeout: Duration::from_secs(60),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            upload_frame_size: DEFAULT_FRAME_SIZE,
            upload_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

impl ClientConfig {
    /// Defaults overlaid with any `XAI_*` environment variables that are set.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = env::var("XAI_API_KEY") {
            if !key.is_empty() {
                cfg.api_key = Some(key);
            }
        }
        if let Ok(host) = env::var("XAI_API_HOST") {
            if !host.is_empty() {
                cfg.api_host = host;
            }
        }
        if let Some(secs) = env_parse::<u64>("XAI_HTTP_TIMEOUT_SECS") {
            cfg.http_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = env_parse::<u64>("XAI_POLL_TIMEOUT_SECS") {
            cfg.poll_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = env_parse::<u64>("XAI_POLL_INTERVAL_MS") {
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse::<usize>("XAI_UPLOAD_FRAME_BYTES") {
            cfg.upload_frame_size = n;
        }
        if let Some(n) = env_parse::<usize>("XAI_UPLOAD_BATCH_SIZE") {
            cfg.upload_batch_size = n;
        }
        cfg
    }

    /// Base URL of the REST API. Local hosts are reached over plain HTTP.
    pub fn rest_base_url(&self) -> String {
        if self.api_host.starts_with("http://") || self.api_host.starts_with("https://") {
            return format!("{}/v1", self.api_host.trim_end_matches('/'));
        }
        let scheme = if self.api_host.starts_with("localhost:") || self.api_host.starts_with("127.0.0.1:") {
            "http"
        } else {
            "https"
        };
        format!("{}://{}/v1", scheme, self.api_host)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload_frame_size == 0 {
            return Err(Error::configuration_with_context(
                "upload frame size must be positive",
                ErrorContext::new().with_field_path("upload_frame_size"),
            ));
        }
        if self.upload_batch_size == 0 {
            return Err(Error::configuration_with_context(
                "upload batch size must be positive",
                ErrorContext::new().with_field_path("upload_batch_size"),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::configuration_with_context(
                "poll interval must be positive",
                ErrorContext::new().with_field_path("poll_interval"),
            ));
        }
        Ok(())
    }
}
