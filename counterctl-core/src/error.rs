/// Structured error types for counterctl-core.
///
/// Library consumers get a `thiserror` enum; the CLI wraps it in `anyhow`.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for counter store and configuration operations
#[derive(Error, Debug)]
pub enum CounterError {
    /// Any storage-layer fault (connection, schema, constraint)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation failed (creating the database directory, reading config)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file exists but could not be parsed
    #[error("invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration value is unusable
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for counterctl-core operations
pub type Result<T> = std::result::Result<T, CounterError>;

impl CounterError {
    /// Create an I/O error tagged with the path involved
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CounterError::config("bind address missing port");
        assert_eq!(
            err.to_string(),
            "configuration error: bind address missing port"
        );

        let err = CounterError::io(
            "/tmp/counter.db",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/counter.db"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: CounterError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CounterError::Database(_)));
    }
}
