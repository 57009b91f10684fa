/// Pipeline wiring error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Missing required input '{required}' for node '{node}'")]
    MissingInput { node: String, required: String },

    #[error("Missing required output '{required}' for node '{node}'")]
    MissingOutput { node: String, required: String },

    #[error("Pipeline configuration error: {message}")]
    ConfigError { message: String },
}

impl ProcessingError {
    /// Create a new ConfigError
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError {
            message: msg.into(),
        }
    }
}

/// Result type alias for pipeline wiring
pub type PipelineResult<T> = Result<T, ProcessingError>;
