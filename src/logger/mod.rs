//! Logger module
//!
//! Server lifecycle lines, access log, per-response trace and error
//! reporting. Falls back to the standard streams until `init` has run.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => writer::write_stdout(message),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => writer::write_stderr(message),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => writer::write_stderr(message),
    }
}

/// The one startup line, printed before the first accept
pub fn log_server_start(addr: &SocketAddr) {
    write_info(&format!("Server listening on port {}...", addr.port()));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

/// Per-response trace, emitted from the header injection step
pub fn log_response_trace(status: u16, header_count: usize) {
    write_info(&format!(
        "[Headers] {status}: CORS and no-store headers added ({header_count} total)"
    ));
}
