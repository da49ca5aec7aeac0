//! # Blocking Module
//!
//! Thread-blocking facade over the async clients.
//!
//! Each [`Client`] owns a current-thread tokio runtime and blocks the calling thread on it
//! for every operation. All accumulation, polling and upload logic is shared with the
//! async API. Do not call into this module from inside an async runtime.
//!
//! ```rust,no_run
//! use xai_sdk::{blocking, ClientBuilder, Message};
//! # fn transport() -> std::sync::Arc<dyn xai_sdk::transport::ChatTransport> { unimplemented!() }
//!
//! # fn main() -> xai_sdk::Result<()> {
//! let client = blocking::Client::new(ClientBuilder::new().chat_transport(transport()).build()?)?;
//! let mut chat = client.chat()?.create("grok-4");
//! chat.append(Message::user("Hello"));
//! let mut response = chat.sample()?;
//! println!("{}", response.content());
//! # Ok(())
//! # }
//! ```

mod chat;
mod files;

pub use chat::{BatchResponseStream, Chat, ChatClient, ResponseStream};
pub use files::FilesClient;

use crate::video::{VideoRequest, VideoResult};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

pub struct Client {
    inner: crate::Client,
    rt: Arc<Runtime>,
}

impl Client {
    pub fn new(inner: crate::Client) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        debug!("blocking client runtime started");
        Ok(Self {
            inner,
            rt: Arc::new(rt),
        })
    }

    pub fn inner(&self) -> &crate::Client {
        &self.inner
    }

    pub fn chat(&self) -> Result<ChatClient> {
        Ok(ChatClient::new(self.inner.chat()?.clone(), self.rt.clone()))
    }

    pub fn files(&self) -> Result<FilesClient> {
        Ok(FilesClient::new(self.inner.files()?.clone(), self.rt.clone()))
    }

    /// Start a video generation and block until it is ready.
    pub fn generate_video(
        &self,
        request: &VideoRequest,
        timeout: Option<Duration>,
        interval: Option<Duration>,
    ) -> Result<VideoResult> {
        self.rt
            .block_on(self.inner.video().generate(request, timeout, interval))
    }
}
