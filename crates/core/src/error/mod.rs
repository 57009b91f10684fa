/// Centralized error handling for build-lib
pub mod buildlib;
pub mod pipeline;

pub use buildlib::{BuildLibError, Result};
pub use pipeline::{PipelineResult, ProcessingError};
