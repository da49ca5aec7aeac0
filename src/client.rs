//! Top-level client.
//!
//! Keep the public surface small: build a [`Client`] with [`ClientBuilder`], then reach
//! the services through [`Client::chat`], [`Client::files`] and [`Client::video`].

pub mod builder;
pub mod core;

pub use self::builder::ClientBuilder;
pub use self::core::Client;
