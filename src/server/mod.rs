// Server module entry point
// Binding, the accept loop and per-connection serving

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config, ServerConfig};
use crate::error::ServeError;
use crate::logger;
use crate::middleware::{cors_no_store_headers, InjectedHeaders};

/// A bound, not yet running file server
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    injected: InjectedHeaders,
}

impl Server {
    /// Bind the listening socket. Must be called inside a Tokio runtime.
    pub fn bind(server: &ServerConfig, config: &Config) -> Result<Self, ServeError> {
        let listener = create_listener(server.addr)?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config, server)),
            injected: cors_no_store_headers(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and serve until the process is terminated.
    ///
    /// Connections are spawned with `spawn_local`, so this must be polled
    /// from within a `LocalSet`.
    pub async fn run(self) {
        start_server_loop(self.listener, self.state, self.injected).await;
    }
}

/// Bind, announce and serve forever.
///
/// Only returns on a startup failure.
pub async fn serve(server: &ServerConfig, config: &Config) -> Result<(), ServeError> {
    let bound = Server::bind(server, config)?;
    let addr = bound.local_addr().map_err(ServeError::Listener)?;
    logger::log_server_start(&addr);

    let local = tokio::task::LocalSet::new();
    local.run_until(bound.run()).await;
    Ok(())
}
