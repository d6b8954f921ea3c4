//! Tracing setup for the counterctl CLI
//!
//! Usage:
//!   counterctl --debug ...                   # Debug logging
//!   RUST_LOG=counterctl_core=debug counterctl  # Fine-grained log control
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//!
//! Filter precedence: RUST_LOG, then --debug, then `log_level` from config, then `info`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the default filter to debug)
    pub debug: bool,
    /// Default filter from config when RUST_LOG is unset
    pub log_level: Option<String>,
}

impl TracingConfig {
    fn default_filter(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            self.log_level.clone().unwrap_or_else(|| "info".to_string())
        }
    }
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_overrides_configured_level() {
        let config = TracingConfig {
            debug: true,
            log_level: Some("warn".into()),
        };
        assert_eq!(config.default_filter(), "debug");
    }

    #[test]
    fn configured_level_then_info() {
        let config = TracingConfig {
            debug: false,
            log_level: Some("warn".into()),
        };
        assert_eq!(config.default_filter(), "warn");
        assert_eq!(TracingConfig::default().default_filter(), "info");
    }
}
