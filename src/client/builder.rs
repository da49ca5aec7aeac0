use crate::chat::ChatClient;
use crate::client::core::Client;
use crate::config::ClientConfig;
use crate::files::FilesClient;
use crate::transport::{ChatTransport, FileTransport, HttpTransport};
use crate::video::VideoClient;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for [`Client`].
///
/// Starts from [`ClientConfig::from_env`]; explicit setters win over the environment.
/// The chat and file services are reached through injected transports, video through
/// the built-in REST transport.
pub struct ClientBuilder {
    config: ClientConfig,
    chat_transport: Option<Arc<dyn ChatTransport>>,
    file_transport: Option<Arc<dyn FileTransport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    /// Start from an explicit configuration, ignoring the environment.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            chat_transport: None,
            file_transport: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// API host, e.g. `api.x.ai` or `localhost:8080`. A full URL is also accepted.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.config.api_host = host.into();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Defaults for deferred polling when a call does not pass its own.
    pub fn poll_defaults(mut self, timeout: Duration, interval: Duration) -> Self {
        self.config.poll_timeout = timeout;
        self.config.poll_interval = interval;
        self
    }

    pub fn upload_frame_size(mut self, bytes: usize) -> Self {
        self.config.upload_frame_size = bytes;
        self
    }

    pub fn upload_batch_size(mut self, n: usize) -> Self {
        self.config.upload_batch_size = n;
        self
    }

    pub fn chat_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.chat_transport = Some(transport);
        self
    }

    pub fn file_transport(mut self, transport: Arc<dyn FileTransport>) -> Self {
        self.file_transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client> {
        self.config.validate()?;
        let config = self.config;

        let chat = self.chat_transport.map(|t| {
            ChatClient::new(t).with_poll_defaults(config.poll_timeout, config.poll_interval)
        });
        let files = self.file_transport.map(|t| {
            FilesClient::new(t)
                .with_frame_size(config.upload_frame_size)
                .with_batch_size(config.upload_batch_size)
        });
        let video = VideoClient::new(HttpTransport::from_config(&config)?)
            .with_poll_defaults(config.poll_timeout, config.poll_interval);

        debug!(
            api_host = %config.api_host,
            has_chat = chat.is_some(),
            has_files = files.is_some(),
            "client built"
        );
        Ok(Client {
            config,
            chat,
            files,
            video,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
