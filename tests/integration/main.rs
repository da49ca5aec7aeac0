//! Integration tests over the public API with scripted transports and a mock HTTP server.

mod common;

mod blocking;
mod deferred;
mod streaming;
mod uploads;
mod video;
