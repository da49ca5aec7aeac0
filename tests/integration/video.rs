//! Video generation against a mock REST server.

use crate::common::init_tracing;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use xai_sdk::transport::HttpTransport;
use xai_sdk::video::{AspectRatio, VideoClient, VideoRequest};
use xai_sdk::{DeferredStatus, Error};

const FAST: Option<Duration> = Some(Duration::from_millis(2));

fn client_for(server: &Server) -> VideoClient {
    let http = HttpTransport::new(
        &format!("{}/v1", server.url()),
        Some("test-key".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    VideoClient::new(http)
}

#[tokio::test]
async fn test_generate_returns_finished_video() {
    init_tracing();
    let mut server = Server::new_async().await;
    let start = server
        .mock("POST", "/v1/videos/generations")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "prompt": "waves at dusk",
            "aspect_ratio": "9:16"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"request_id":"vid-1"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/v1/videos/vid-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "done",
                "model": "grok-imagine-video",
                "video": {"url": "https://cdn.example/vid-1.mp4", "duration": 8, "respect_moderation": true}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let request = VideoRequest::new("waves at dusk", "grok-imagine-video")
        .aspect_ratio(AspectRatio::Portrait9x16);
    let video = client
        .generate(&request, Some(Duration::from_secs(5)), FAST)
        .await
        .unwrap();

    assert_eq!(video.url().unwrap(), "https://cdn.example/vid-1.mp4");
    assert_eq!(video.duration, 8);
    assert_eq!(video.model, "grok-imagine-video");
    start.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn test_pending_poll_keeps_raw_status() {
    let mut server = Server::new_async().await;
    let _poll = server
        .mock("GET", "/v1/videos/vid-2")
        .with_status(200)
        .with_body(r#"{"status":"processing"}"#)
        .create_async()
        .await;

    let poll = client_for(&server).get("vid-2").await.unwrap();
    assert_eq!(poll.status, DeferredStatus::Pending);
    assert!(poll.response.is_none());
    assert_eq!(poll.detail.as_deref(), Some("processing"));
}

#[tokio::test]
async fn test_failed_generation_is_expired() {
    let mut server = Server::new_async().await;
    let _start = server
        .mock("POST", "/v1/videos/edits")
        .with_status(200)
        .with_body(r#"{"request_id":"vid-3"}"#)
        .create_async()
        .await;
    let _poll = server
        .mock("GET", "/v1/videos/vid-3")
        .with_status(200)
        .with_body(r#"{"status":"failed"}"#)
        .create_async()
        .await;

    let request = VideoRequest::new("make it rain", "grok-imagine-video")
        .video_url("https://cdn.example/in.mp4");
    let err = client_for(&server)
        .generate(&request, Some(Duration::from_secs(5)), FAST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Expired { ref request_id, ref detail }
        if request_id == "vid-3" && detail.as_deref() == Some("failed")));
}

#[tokio::test]
async fn test_server_error_surfaces_status() {
    let mut server = Server::new_async().await;
    let _start = server
        .mock("POST", "/v1/videos/generations")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let err = client_for(&server)
        .start(&VideoRequest::new("x", "grok-imagine-video"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote { status: 429, ref message } if message == "slow down"));
}
