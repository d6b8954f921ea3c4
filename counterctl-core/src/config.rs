use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{CounterError, Result};

/// Default HTTP bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";

/// Configuration for counterctl, read from ~/.counterctl/config.toml
///
/// Every field is optional in the file; missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// SQLite URL, e.g. `sqlite:///var/lib/counterctl/counter.db`
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
    /// Default log filter when RUST_LOG is unset
    pub log_level: Option<String>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_permissive: false,
            log_level: None,
        }
    }
}

impl CounterConfig {
    /// Load config from ~/.counterctl/config.toml, then apply environment overrides.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Load config from an explicit path without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CounterError::io(path, e))?;
        toml::from_str(&content).map_err(|source| CounterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get config file path: ~/.counterctl/config.toml
    pub fn config_path() -> PathBuf {
        counterctl_home().join("config.toml")
    }

    /// Apply overrides from an environment-like lookup.
    ///
    /// `COUNTERCTL_DATABASE_URL` wins over `DATABASE_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("COUNTERCTL_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.database_url = url;
        }
        if let Some(bind) = lookup("COUNTERCTL_BIND") {
            self.bind_addr = bind;
        }
        if let Some(level) = lookup("COUNTERCTL_LOG") {
            self.log_level = Some(level);
        }
    }

    /// Parse the configured bind address
    pub fn bind_socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            CounterError::config(format!("invalid bind_addr '{}': {}", self.bind_addr, e))
        })
    }
}

/// ~/.counterctl (falls back to ./.counterctl without a home directory)
pub fn counterctl_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".counterctl")
}

/// sqlite://~/.counterctl/counter.db
pub fn default_database_url() -> String {
    format!("sqlite://{}", counterctl_home().join("counter.db").display())
}
