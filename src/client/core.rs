use crate::chat::ChatClient;
use crate::config::ClientConfig;
use crate::files::FilesClient;
use crate::video::VideoClient;
use crate::{Error, ErrorContext, Result};

/// Entry point bundling the chat, files and video clients.
pub struct Client {
    pub(crate) config: ClientConfig,
    pub(crate) chat: Option<ChatClient>,
    pub(crate) files: Option<FilesClient>,
    pub(crate) video: VideoClient,
}

impl Client {
    pub fn builder() -> super::ClientBuilder {
        super::ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Chat sessions. Requires a chat transport.
    pub fn chat(&self) -> Result<&ChatClient> {
        self.chat
            .as_ref()
            .ok_or_else(|| missing_transport("chat_transport"))
    }

    /// File uploads. Requires a file transport.
    pub fn files(&self) -> Result<&FilesClient> {
        self.files
            .as_ref()
            .ok_or_else(|| missing_transport("file_transport"))
    }

    pub fn video(&self) -> &VideoClient {
        &self.video
    }
}

fn missing_transport(field: &str) -> Error {
    Error::configuration_with_context(
        "no transport configured for this service",
        ErrorContext::new()
            .with_field_path(field)
            .with_source("client"),
    )
}
