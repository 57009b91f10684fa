/// Fatal error type for build-lib.
///
/// Tool failures inside a build are never reported through this type; they
/// are recorded as [`crate::report::StageError`] entries instead.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildLibError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read output statistics for {}: {source}", path.display())]
    Stats {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::error::ProcessingError),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Failed to start server on port {port}: {message}")]
    Serve { port: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Eject(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using BuildLibError
pub type Result<T> = std::result::Result<T, BuildLibError>;

impl BuildLibError {
    /// Create a spawn error for an external tool
    pub fn spawn(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }

    /// Create a stats error for the output directory
    pub fn stats(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stats {
            path: path.into(),
            source,
        }
    }

    /// Create a watch error
    pub fn watch(msg: impl Into<String>) -> Self {
        Self::Watch(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an eject error
    pub fn eject(msg: impl Into<String>) -> Self {
        Self::Eject(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<String> for BuildLibError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for BuildLibError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<serde_json::Error> for BuildLibError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
