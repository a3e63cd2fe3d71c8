//! Server settings: listen address and the directory holding the built client.
//!
//! Settings come from an optional TOML file (`CONFIG_PATH`, default
//! `config.toml`) and are then overridden by `HOST`, `PORT` and `STATIC_DIR`
//! from the environment. A missing file is not an error; every setting has a
//! default.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Directory with the built client bundle (must contain `index.html`)
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            static_dir: PathBuf::from("client/build"),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Applies `HOST`, `PORT` and `STATIC_DIR` overrides from `lookup`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `PORT` is set but is not a valid port number.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|e| Error::Config {
                message: format!("Invalid PORT value {port:?}: {e}"),
            })?;
        }

        if let Some(static_dir) = lookup("STATIC_DIR") {
            self.static_dir = PathBuf::from(static_dir);
        }

        Ok(self)
    }
}

/// Parses server settings from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is malformed or has wrongly typed values.
pub fn parse_config(contents: &str) -> Result<ServerConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse server config: {e}"),
    })
}

/// Loads server settings from a TOML file, using defaults if it does not exist.
///
/// # Errors
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        debug!("No config file at {path:?}, using defaults");
        return Ok(ServerConfig::default());
    }

    debug!("Loading server config from {path:?}");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads the effective server settings: file named by `CONFIG_PATH` (or the
/// default location) plus environment overrides.
///
/// # Errors
/// Returns [`Error::Config`] if the file is unreadable or malformed, or an
/// override is invalid.
pub fn load_server_config() -> Result<ServerConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&path)?.apply_overrides(|key| std::env::var(key).ok())?;

    info!(
        address = %config.address(),
        static_dir = %config.static_dir.display(),
        "Server configuration loaded"
    );
    Ok(config)
}
