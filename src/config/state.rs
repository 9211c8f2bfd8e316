// Application state module
// Read-only state shared by every connection of one server

use std::path::{Path, PathBuf};

use super::types::{Config, ServerConfig};

/// Application state
///
/// Built once per server and handed to connections behind an `Arc`.
/// Nothing in here changes after startup.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    root: PathBuf,
}

impl AppState {
    pub fn new(config: &Config, server: &ServerConfig) -> Self {
        Self {
            config: config.clone(),
            root: server.root.clone(),
        }
    }

    /// Directory every request path is resolved under
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
