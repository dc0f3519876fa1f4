//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use ticklist_store::StoreConfig;

/// Configuration for the task server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory of the durable store; `None` keeps tasks in memory.
    pub data_dir: Option<PathBuf>,
    /// Whether to answer cross-origin requests from any origin.
    pub cors: bool,
    /// Options for the durable store.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            data_dir: None,
            cors: true,
            store: StoreConfig::default(),
        }
    }

    /// Persists tasks in the given directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Enables or disables permissive CORS.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Sets the durable store options.
    pub fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 5000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.data_dir.is_none());
        assert!(config.cors);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_data_dir("/var/lib/ticklist")
            .with_cors(false)
            .with_store_config(StoreConfig::new().sync_on_write(false));

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/ticklist")));
        assert!(!config.cors);
        assert!(!config.store.sync_on_write);
    }
}
