//! Pure build-orchestration logic for component libraries.
//!
//! Everything here is free of process, file system and network I/O; the
//! `buildlib-core-full` crate drives these types against the real world.

pub mod args;
pub mod config;
pub mod css;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod plugin;
pub mod report;
pub mod watch;

pub use args::{BuildArgs, Invocation, Mode, Precedence, WatchKind};
pub use error::{BuildLibError, ProcessingError, Result};
pub use layout::ProjectLayout;
pub use report::{AssetEntry, ErrorList, Stage, StageError, StatsReport};
