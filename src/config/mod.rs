// Configuration module entry point
// Fixed endpoint constants, ambient settings loading and per-server state

mod state;
mod types;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// All interfaces
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 80;

/// Optional settings file, looked up relative to the working directory
pub const CONFIG_FILE: &str = "nocache-serve";

impl Config {
    /// Load ambient settings with the default file name
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error: the built-in defaults apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("logging.trace_responses", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 0)?
            .build()?;

        settings.try_deserialize()
    }
}

impl ServerConfig {
    /// The fixed production endpoint: every interface, port 80, serving the
    /// current working directory.
    pub fn from_cwd() -> std::io::Result<Self> {
        Ok(Self {
            addr: SocketAddr::new(DEFAULT_HOST, DEFAULT_PORT),
            root: std::env::current_dir()?,
        })
    }

    pub fn new(addr: SocketAddr, root: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            root: root.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist-anywhere").unwrap();
        assert!(cfg.logging.access_log);
        assert!(cfg.logging.trace_responses);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.header_read_timeout(), None);
        assert_eq!(cfg.performance.workers, None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[logging]\ntrace_responses = false\naccess_log_format = \"json\"\n\n[performance]\nheader_read_timeout = 90\nworkers = 2"
        )
        .unwrap();

        let stem = dir.path().join("settings");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert!(!cfg.logging.trace_responses);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.workers, Some(2));
        assert_eq!(
            cfg.performance.header_read_timeout(),
            Some(std::time::Duration::from_secs(90))
        );
    }

    #[test]
    fn test_fixed_endpoint() {
        let server = ServerConfig::from_cwd().unwrap();
        assert_eq!(server.addr.port(), 80);
        assert!(server.addr.ip().is_unspecified());
        assert_eq!(server.root, std::env::current_dir().unwrap());
    }
}
