//! Startup error types.
//!
//! Request-level failures never surface here: they become HTTP error
//! responses inside the handler.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors that end the process before or while the server starts.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listening socket could not be created or bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The bound socket could not be handed to the runtime.
    #[error("failed to register listener: {0}")]
    Listener(#[source] std::io::Error),

    /// The settings file exists but could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The async runtime could not be built.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Log files could not be opened.
    #[error("failed to open log file: {0}")]
    Logger(#[source] std::io::Error),

    /// The working directory is unavailable.
    #[error("cannot resolve document root: {0}")]
    Root(#[source] std::io::Error),
}
