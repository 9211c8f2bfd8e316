// Connection module
// Serves one accepted TCP connection over HTTP/1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;
use crate::middleware::{AccessLog, InjectHeaders, InjectedHeaders};

/// Serve a single connection in a spawned local task.
///
/// The service stack is built per connection: access logging outermost,
/// then header injection, then the file handler. Requests on one
/// keep-alive connection are answered in order. There is no limit on how
/// long a connection lives or how long a response takes to send.
///
/// Must be called from within a `LocalSet`.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    injected: InjectedHeaders,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let logging = &state.config.logging;
        let performance = &state.config.performance;

        let access_format = state
            .access_log()
            .then(|| Arc::<str>::from(logging.access_log_format.as_str()));
        let trace = logging.trace_responses;

        let handler_state = Arc::clone(&state);
        let files = service_fn(move |req| handler::handle_request(req, Arc::clone(&handler_state)));
        let service = AccessLog::new(
            InjectHeaders::new(files, injected)
                .with_keep_alive(performance.keep_alive)
                .with_trace(trace),
            peer_addr,
            access_format,
        );

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive);
        // hyper only enforces a head timeout once a timer is installed
        if let Some(limit) = performance.header_read_timeout() {
            builder.timer(TokioTimer::new()).header_read_timeout(limit);
        }

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
