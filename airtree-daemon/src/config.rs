//! Daemon configuration loading from `.airtree.toml`.
//!
//! Configuration is optional. Missing sections and keys fall back to
//! defaults, and command-line flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 9130
//!
//! [storage]
//! path = "routes.airtree"
//! memory = false
//!
//! [logging]
//! verbose = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".airtree.toml";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 9130;

/// Errors raised while loading configuration in strict mode.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration structure loaded from `.airtree.toml`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct DaemonConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log verbosity.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct StorageConfig {
    /// DuckDB database file. Defaults to `.airtree/routes.airtree` under the
    /// working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart.
    #[serde(default)]
    pub memory: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log at DEBUG instead of INFO.
    #[serde(default)]
    pub verbose: bool,
}

impl DaemonConfig {
    /// Load configuration from `.airtree.toml` in the given directory.
    ///
    /// If the file doesn't exist or can't be parsed, returns defaults. A read
    /// or parse failure is handed back next to the defaults so the caller can
    /// report it once logging is up.
    pub fn load(root: &Path) -> (Self, Option<ConfigError>) {
        match Self::load_strict(root) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load configuration, failing on unreadable or malformed files.
    ///
    /// A missing file is not an error.
    pub fn load_strict(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    /// Parse a specific configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Database path, resolved against `root` when relative.
    pub fn database_path(&self, root: &Path) -> PathBuf {
        match &self.storage.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(".airtree").join("routes.airtree"),
        }
    }

    /// Listener address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
