use crate::chat::{self as async_chat, Chunk, Response};
use crate::types::Message;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Clone)]
pub struct ChatClient {
    inner: async_chat::ChatClient,
    rt: Arc<Runtime>,
}

impl ChatClient {
    pub(crate) fn new(inner: async_chat::ChatClient, rt: Arc<Runtime>) -> Self {
        Self { inner, rt }
    }

    pub fn create(&self, model: impl Into<String>) -> Chat {
        Chat {
            inner: self.inner.create(model),
            rt: self.rt.clone(),
        }
    }
}

/// Blocking counterpart of [`crate::chat::Chat`].
#[derive(Clone)]
pub struct Chat {
    inner: async_chat::Chat,
    rt: Arc<Runtime>,
}

impl Chat {
    pub fn append(&mut self, message: Message) -> &mut Self {
        self.inner.append(message);
        self
    }

    pub fn append_response(&mut self, response: &mut Response) -> &mut Self {
        self.inner.append_response(response);
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.inner.messages()
    }

    /// Apply the async session's request setters.
    ///
    /// ```rust,ignore
    /// let chat = client.chat()?.create("grok-4").configure(|c| c.max_tokens(64).seed(7));
    /// ```
    pub fn configure(self, f: impl FnOnce(async_chat::Chat) -> async_chat::Chat) -> Self {
        Self {
            inner: f(self.inner),
            rt: self.rt,
        }
    }

    pub fn sample(&self) -> Result<Response> {
        self.rt.block_on(self.inner.sample())
    }

    pub fn sample_batch(&self, n: u32) -> Result<Vec<Response>> {
        self.rt.block_on(self.inner.sample_batch(n))
    }

    pub fn stream(&self) -> Result<ResponseStream> {
        let inner = self.rt.block_on(self.inner.stream())?;
        Ok(ResponseStream {
            inner,
            rt: self.rt.clone(),
        })
    }

    pub fn stream_batch(&self, n: u32) -> Result<BatchResponseStream> {
        let inner = self.rt.block_on(self.inner.stream_batch(n))?;
        Ok(BatchResponseStream {
            inner,
            rt: self.rt.clone(),
        })
    }

    pub fn defer(&self, timeout: Option<Duration>, interval: Option<Duration>) -> Result<Response> {
        self.rt.block_on(self.inner.defer(timeout, interval))
    }

    pub fn defer_batch(
        &self,
        n: u32,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<Vec<Response>> {
        self.rt.block_on(self.inner.defer_batch(n, timeout, interval))
    }
}

/// Blocking single-output stream.
///
/// Use [`ResponseStream::next`] to see the accumulator after every chunk, or iterate
/// to get just the chunks and read [`ResponseStream::response`] afterwards.
pub struct ResponseStream {
    inner: async_chat::ResponseStream,
    rt: Arc<Runtime>,
}

impl ResponseStream {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<(&mut Response, Chunk)>> {
        self.rt.block_on(self.inner.next())
    }

    pub fn response(&mut self) -> &mut Response {
        self.inner.response()
    }

    pub fn into_response(self) -> Response {
        self.inner.into_response()
    }

    pub fn collect_final(self) -> Result<Response> {
        self.rt.block_on(self.inner.collect_final())
    }
}

impl Iterator for ResponseStream {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        ResponseStream::next(self).map(|step| step.map(|(_, chunk)| chunk))
    }
}

/// Blocking N-output stream with one accumulator per output index.
pub struct BatchResponseStream {
    inner: async_chat::BatchResponseStream,
    rt: Arc<Runtime>,
}

impl BatchResponseStream {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<(&mut [Response], Vec<Chunk>)>> {
        self.rt.block_on(self.inner.next())
    }

    pub fn n(&self) -> u32 {
        self.inner.n()
    }

    pub fn responses(&mut self) -> &mut [Response] {
        self.inner.responses()
    }

    pub fn into_responses(self) -> Vec<Response> {
        self.inner.into_responses()
    }

    pub fn collect_final(self) -> Result<Vec<Response>> {
        self.rt.block_on(self.inner.collect_final())
    }
}
