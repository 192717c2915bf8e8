// ── Runtime connection configuration ──
//
// Describes *how* to reach the parking service and where session state
// lives. Never touches config files: the CLI (or any other host) builds a
// `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use parkly_api::TlsMode;
use url::Url;

/// Where the session store mirrors its state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageConfig {
    /// Nothing survives the process.
    #[default]
    Memory,
    /// One JSON file per key in the given directory.
    Directory(PathBuf),
}

/// Configuration for one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:5000`. Endpoint paths are
    /// appended to it.
    pub base_url: Url,
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    pub storage: StorageConfig,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            storage: StorageConfig::Memory,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }
}
