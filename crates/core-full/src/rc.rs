//! Options from `.dojorc` or an ejected options file.
//!
//! Precedence: command line, then the options file, then defaults.

use buildlib_core::config::constants::{DEFAULT_PORT, command_key};
use buildlib_core::error::{BuildLibError, Result};
use buildlib_core::{BuildArgs, Mode, Precedence, ProjectLayout, WatchKind};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// `watch` may be given as a flag or as a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WatchOption {
    Flag(bool),
    Kind(WatchKind),
}

impl WatchOption {
    fn kind(self) -> Option<WatchKind> {
        match self {
            WatchOption::Flag(true) => Some(WatchKind::File),
            WatchOption::Flag(false) => None,
            WatchOption::Kind(kind) => Some(kind),
        }
    }
}

/// The command's block in the rc file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildLibOptions {
    pub mode: Option<Mode>,
    pub watch: Option<WatchOption>,
    pub legacy: Option<bool>,
    pub serve: Option<bool>,
    pub port: Option<u16>,
    pub precedence: Option<Precedence>,
}

impl BuildLibOptions {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| BuildLibError::invalid_config(format!("build-lib options: {e}")))
    }
}

/// Values given on the command line; `None`/`false` means not given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub mode: Option<Mode>,
    pub watch: Option<WatchKind>,
    pub legacy: bool,
    pub serve: bool,
    pub port: Option<u16>,
    pub precedence: Option<Precedence>,
}

/// Merge command line values over file options over defaults
pub fn resolve_args(file: BuildLibOptions, cli: OptionOverrides) -> BuildArgs {
    BuildArgs {
        mode: cli.mode.or(file.mode).unwrap_or_default(),
        watch: cli.watch.or(file.watch.and_then(WatchOption::kind)),
        legacy: cli.legacy || file.legacy.unwrap_or(false),
        serve: cli.serve || file.serve.unwrap_or(false),
        port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        precedence: cli.precedence.or(file.precedence).unwrap_or_default(),
    }
}

/// Read the whole rc file; a missing file is an empty object
pub fn read_rc(path: &Path) -> Result<Value> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|e| {
            BuildLibError::invalid_config(format!("{}: {}", path.display(), e))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Value::Object(Default::default())),
        Err(e) => Err(e.into()),
    }
}

/// This command's block from the project rc file
pub fn load_rc_options(layout: &ProjectLayout) -> Result<BuildLibOptions> {
    let rc = read_rc(&layout.rc_path())?;
    match rc.get(command_key()) {
        Some(block) => {
            debug!("Using options from {:?}", layout.rc_path());
            BuildLibOptions::from_value(block.clone())
        }
        None => Ok(BuildLibOptions::default()),
    }
}

/// Options file written by eject: the block itself at top level
pub fn load_options_file(path: &Path) -> Result<BuildLibOptions> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BuildLibError::invalid_config(format!("failed to read {}: {}", path.display(), e))
    })?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| BuildLibError::invalid_config(format!("{}: {}", path.display(), e)))?;
    BuildLibOptions::from_value(value)
}
