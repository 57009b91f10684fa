//! Build orchestration I/O: tool processes, file copies, CSS processing,
//! watching, serving, eject and terminal reporting.

pub mod command;
pub mod commands;
pub mod css;
pub mod eject;
pub mod io;
pub mod pipeline;
pub mod process;
pub mod rc;
pub mod reporter;
pub mod serve;
pub mod stats;
pub mod watch;

// Re-export commonly used types
pub use command::{BuildLibCommand, HostCommand};
pub use commands::BuildPipeline;
pub use process::{ProcessRunner, ToolOutcome, ToolRunner};
pub use reporter::{StatusReporter, Versions};
pub use serve::StaticServer;
pub use watch::{BuildCallback, WatchCoordinator};
