// Configuration types module
// Defines the ambient settings read at startup and the fixed server endpoint

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Ambient configuration (logging and connection tuning)
///
/// The listening address and document root are not part of it: they are
/// passed explicitly to the server through [`ServerConfig`].
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Where the server listens and what it serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit one access log line per request
    pub access_log: bool,
    /// Access log format (common, combined, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Print a trace line every time the fixed headers are injected
    pub trace_responses: bool,
    /// Access log file path (optional, stderr if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for a request head to arrive, 0 for no limit
    pub header_read_timeout: u64,
    pub workers: Option<usize>,
}

impl PerformanceConfig {
    /// Limit on reading a request head. Response bodies are never cut off.
    pub fn header_read_timeout(&self) -> Option<std::time::Duration> {
        (self.header_read_timeout > 0)
            .then(|| std::time::Duration::from_secs(self.header_read_timeout))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                access_log: true,
                access_log_format: default_access_log_format(),
                trace_responses: true,
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                header_read_timeout: 0,
                workers: None,
            },
        }
    }
}
