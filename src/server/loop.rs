// Server loop module
// Accepts connections forever; there is no stop state

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;
use crate::middleware::InjectedHeaders;

/// Accept loop. Each connection is handed to its own local task.
///
/// Accept errors (e.g. file descriptor exhaustion) are logged and the loop
/// carries on with the next connection.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, injected: InjectedHeaders) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                handle_connection(stream, peer_addr, Arc::clone(&state), Arc::clone(&injected));
            }
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
