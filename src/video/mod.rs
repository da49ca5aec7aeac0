//! # Video Module
//!
//! Deferred video generation over the REST API.
//!
//! A generation is started with `POST videos/generations` (or `videos/edits` when a source
//! video is given) and polled with `GET videos/{request_id}`. REST status strings are
//! mapped onto [`DeferredStatus`] and driven by the shared poll loop in
//! [`crate::deferred`].

use crate::deferred::{self, PollTimer};
use crate::transport::HttpTransport;
use crate::types::{DeferredPoll, DeferredStatus};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, info_span, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "2:3")]
    Portrait2x3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrl {
    pub url: String,
}

/// Body of a generation (or edit) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
    pub model: String,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaUrl>,
    #[serde(rename = "video", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaUrl>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

impl VideoRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            image: None,
            video: None,
            duration: None,
            aspect_ratio: None,
            resolution: None,
        }
    }

    /// Animate a still image.
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image = Some(MediaUrl { url: url.into() });
        self
    }

    /// Edit an existing video; switches the request to the edits endpoint.
    pub fn video_url(mut self, url: impl Into<String>) -> Self {
        self.video = Some(MediaUrl { url: url.into() });
        self
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    fn endpoint(&self) -> &'static str {
        if self.video.is_some() {
            "videos/edits"
        } else {
            "videos/generations"
        }
    }
}

/// Finished video. The URL is valid for a limited time.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoResult {
    url: String,
    pub duration: u64,
    pub model: String,
    pub respect_moderation: bool,
    pub usage: BTreeMap<String, u64>,
}

impl VideoResult {
    /// Accepts both the nested (`{"video": {...}}`) and the flat response shape.
    fn from_json(data: &Value) -> Self {
        let video = data.get("video").filter(|v| v.is_object()).unwrap_or(data);
        let pick = |key: &str| video.get(key).or_else(|| data.get(key));
        Self {
            url: pick("url").and_then(Value::as_str).unwrap_or_default().to_string(),
            duration: pick("duration").and_then(Value::as_u64).unwrap_or(0),
            model: data
                .get("model")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            respect_moderation: video
                .get("respect_moderation")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            usage: data
                .get("usage")
                .and_then(Value::as_object)
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| v.as_u64().map(|n| (k.clone(), n)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn url(&self) -> Result<&str> {
        if self.url.is_empty() {
            let message = if self.respect_moderation {
                "video URL missing from response"
            } else {
                "video did not respect moderation rules; URL is not available"
            };
            return Err(Error::invalid_response_with_context(
                message,
                ErrorContext::new().with_field_path("url").with_source("video"),
            ));
        }
        Ok(&self.url)
    }
}

/// Map a REST status string onto the deferred status set.
pub fn map_status(raw: &str) -> DeferredStatus {
    match raw.to_ascii_lowercase().as_str() {
        "done" | "completed" => DeferredStatus::Done,
        "expired" | "failed" => DeferredStatus::Expired,
        "pending" | "processing" => DeferredStatus::Pending,
        _ => DeferredStatus::Unknown(raw.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct VideoClient {
    http: HttpTransport,
    poll_timeout: Duration,
    poll_interval: Duration,
}

impl VideoClient {
    pub fn new(http: HttpTransport) -> Self {
        Self {
            http,
            poll_timeout: deferred::timer::DEFAULT_POLL_TIMEOUT,
            poll_interval: deferred::timer::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_defaults(mut self, timeout: Duration, interval: Duration) -> Self {
        self.poll_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    /// Start a generation and return its request id.
    pub async fn start(&self, request: &VideoRequest) -> Result<String> {
        let data: Value = self.http.post_json(request.endpoint(), request).await?;
        let request_id = data
            .get("request_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::invalid_response_with_context(
                    "start response carries no request id",
                    ErrorContext::new()
                        .with_field_path("request_id")
                        .with_source("video"),
                )
            })?;
        info!(request_id, endpoint = request.endpoint(), "video generation started");
        Ok(request_id.to_string())
    }

    /// Query a generation once.
    pub async fn get(&self, request_id: &str) -> Result<DeferredPoll<VideoResult>> {
        let data: Value = self.http.get_json(&format!("videos/{}", request_id)).await?;
        let raw = data
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("pending")
            .to_string();
        let poll = match map_status(&raw) {
            DeferredStatus::Done => DeferredPoll::done(VideoResult::from_json(&data)),
            DeferredStatus::Expired => DeferredPoll::expired(),
            DeferredStatus::Pending => DeferredPoll::pending(),
            DeferredStatus::Unknown(s) => DeferredPoll::unknown(s),
        };
        Ok(poll.with_detail(raw))
    }

    /// Start a generation and poll until the video is ready.
    pub async fn generate(
        &self,
        request: &VideoRequest,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<VideoResult> {
        let span = info_span!("video.generate", model = %request.model);
        async {
            let timer = PollTimer::new(
                Some(timeout.unwrap_or(self.poll_timeout)),
                Some(interval.unwrap_or(self.poll_interval)),
            );
            let request_id = self.start(request).await?;
            deferred::poll_until_done(&request_id, timer, || self.get(&request_id)).await
        }
        .instrument(span)
        .await
    }
}
