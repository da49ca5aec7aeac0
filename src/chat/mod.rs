//! # Chat Module
//!
//! Conversation sessions and the completion accumulator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatClient`] | Creates [`Chat`] sessions over a [`ChatTransport`] |
//! | [`Chat`] | Owns the conversation and issues sample/stream/defer calls |
//! | [`Response`] | Accumulated completion with lazily synced text |
//! | [`Chunk`] | View over one streaming chunk |
//! | [`ResponseStream`] / [`BatchResponseStream`] | Pull-based streaming iteration |
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn run(client: xai_sdk::Client) -> xai_sdk::Result<()> {
//! use xai_sdk::Message;
//!
//! let mut chat = client.chat()?.create("grok-4");
//! chat.append(Message::user("Tell me a joke"));
//!
//! let mut stream = chat.stream().await?;
//! while let Some(step) = stream.next().await {
//!     let (_response, chunk) = step?;
//!     print!("{}", chunk);
//! }
//! let mut response = stream.into_response();
//! chat.append_response(&mut response);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod chunk;
pub mod response;
pub mod stream;

pub use buffer::TextBuffer;
pub use chunk::Chunk;
pub use response::Response;
pub use stream::{BatchResponseStream, ResponseStream};

use crate::deferred::{self, PollTimer};
use crate::transport::ChatTransport;
use crate::types::{CompletionRequest, Message, MessageContent, Role};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, Instrument};

/// Entry point for chat sessions.
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ChatTransport>,
    poll_timeout: Duration,
    poll_interval: Duration,
}

impl ChatClient {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            poll_timeout: deferred::timer::DEFAULT_POLL_TIMEOUT,
            poll_interval: deferred::timer::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Default timeout and interval for [`Chat::defer`] when none is given.
    pub fn with_poll_defaults(mut self, timeout: Duration, interval: Duration) -> Self {
        self.poll_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    /// Start an empty conversation with `model`.
    pub fn create(&self, model: impl Into<String>) -> Chat {
        Chat {
            transport: self.transport.clone(),
            request: CompletionRequest::new(model),
            poll_timeout: self.poll_timeout,
            poll_interval: self.poll_interval,
        }
    }
}

/// A conversation plus the request knobs used for every call made from it.
#[derive(Clone)]
pub struct Chat {
    transport: Arc<dyn ChatTransport>,
    request: CompletionRequest,
    poll_timeout: Duration,
    poll_interval: Duration,
}

impl Chat {
    pub fn append(&mut self, message: Message) -> &mut Self {
        self.request.messages.push(message);
        self
    }

    /// Append the assistant turn of a finished response (text, tool calls and encrypted
    /// reasoning), so the conversation can continue.
    pub fn append_response(&mut self, response: &mut Response) -> &mut Self {
        let content = response.content().into_owned();
        let encrypted = response.encrypted_content().into_owned();
        let tool_calls = response.tool_calls().into_iter().cloned().collect();
        let message = Message::with_content(Role::Assistant, MessageContent::Text(content))
            .with_tool_calls(tool_calls)
            .with_encrypted_content(encrypted);
        self.append(message)
    }

    pub fn messages(&self) -> &[Message] {
        &self.request.messages
    }

    pub fn model(&self) -> &str {
        &self.request.model
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.request.max_tokens = Some(max);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.request.temperature = Some(temp);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.request.top_p = Some(top_p);
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.request.seed = Some(seed);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.request.stop = stop;
        self
    }

    pub fn logprobs(mut self, top_logprobs: u32) -> Self {
        self.request.logprobs = Some(true);
        self.request.top_logprobs = Some(top_logprobs);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.request.user = Some(user.into());
        self
    }

    pub fn use_encrypted_content(mut self, enable: bool) -> Self {
        self.request.use_encrypted_content = Some(enable);
        self
    }

    /// Request for `n` outputs built from the current conversation.
    pub fn make_request(&self, n: u32) -> Result<CompletionRequest> {
        if self.request.messages.is_empty() {
            return Err(Error::validation_with_context(
                "at least one message is required",
                ErrorContext::new()
                    .with_field_path("messages")
                    .with_source("chat"),
            ));
        }
        if n == 0 {
            return Err(Error::validation_with_context(
                "n must be at least 1",
                ErrorContext::new().with_field_path("n").with_source("chat"),
            ));
        }
        let mut request = self.request.clone();
        request.n = n;
        Ok(request)
    }

    /// Single completion.
    pub async fn sample(&self) -> Result<Response> {
        let request = self.make_request(1)?;
        let span = info_span!("chat.sample", model = %request.model);
        let proto = self
            .transport
            .get_completion(&request)
            .instrument(span)
            .await?;
        Response::new(proto, Some(0))
    }

    /// `n` independent completions of the same conversation, one [`Response`] each.
    pub async fn sample_batch(&self, n: u32) -> Result<Vec<Response>> {
        let request = self.make_request(n)?;
        let span = info_span!("chat.sample_batch", model = %request.model, n);
        let proto = self
            .transport
            .get_completion(&request)
            .instrument(span)
            .await?;
        Response::split(proto, n)
    }

    pub async fn stream(&self) -> Result<ResponseStream> {
        let request = self.make_request(1)?;
        let span = info_span!("chat.stream", model = %request.model);
        let chunks = self
            .transport
            .stream_completion(&request)
            .instrument(span.clone())
            .await?;
        Ok(ResponseStream::new(chunks, Response::empty(1, Some(0))?, span))
    }

    pub async fn stream_batch(&self, n: u32) -> Result<BatchResponseStream> {
        let request = self.make_request(n)?;
        let span = info_span!("chat.stream_batch", model = %request.model, n);
        let chunks = self
            .transport
            .stream_completion(&request)
            .instrument(span.clone())
            .await?;
        BatchResponseStream::new(chunks, n, span)
    }

    /// Start a deferred completion and poll until it is done.
    ///
    /// `None` falls back to the client's poll defaults.
    pub async fn defer(&self, timeout: Option<Duration>, interval: Option<Duration>) -> Result<Response> {
        let proto = self.defer_proto(1, timeout, interval).await?;
        Response::new(proto, Some(0))
    }

    pub async fn defer_batch(
        &self,
        n: u32,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<Vec<Response>> {
        let proto = self.defer_proto(n, timeout, interval).await?;
        Response::split(proto, n)
    }

    async fn defer_proto(
        &self,
        n: u32,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<crate::types::CompletionResponse> {
        let request = self.make_request(n)?;
        let span = info_span!("chat.defer", model = %request.model, n);
        async {
            let timer = PollTimer::new(
                Some(timeout.unwrap_or(self.poll_timeout)),
                Some(interval.unwrap_or(self.poll_interval)),
            );
            let request_id = self.transport.start_deferred(&request).await?;
            info!(request_id = %request_id, "deferred completion started");
            let transport = self.transport.clone();
            let id = request_id.clone();
            deferred::poll_until_done(&request_id, timer, move || {
                let transport = transport.clone();
                let id = id.clone();
                async move { transport.get_deferred(&id).await }
            })
            .await
        }
        .instrument(span)
        .await
    }
}
