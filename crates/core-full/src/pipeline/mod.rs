// Pipeline module for I/O operations

pub mod nodes;

// Re-export commonly used types from core
pub use buildlib_core::pipeline::{PipeMap, PipeNode, Pipeline};

// Re-export nodes
pub use nodes::*;
