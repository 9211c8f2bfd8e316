//! Static file server that adds permissive CORS and no-store caching
//! headers to every response.
//!
//! ```no_run
//! use nocache_serve::config::{Config, ServerConfig};
//!
//! # async fn run() -> Result<(), nocache_serve::ServeError> {
//! let target = ServerConfig::new("127.0.0.1:8080".parse().unwrap(), ".");
//! nocache_serve::server::serve(&target, &Config::default()).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod middleware;
pub mod server;

pub use error::ServeError;
