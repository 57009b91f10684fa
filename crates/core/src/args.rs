//! Per-invocation build arguments

use crate::config::constants::DEFAULT_PORT;
use crate::error::BuildLibError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output mode; selects `output/<mode>` and whether tests are built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Dist,
    Dev,
    Test,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Dist, Mode::Dev, Mode::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dist => "dist",
            Mode::Dev => "dev",
            Mode::Test => "test",
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Mode::Test)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BuildLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dist" => Ok(Mode::Dist),
            "dev" => Ok(Mode::Dev),
            "test" => Ok(Mode::Test),
            other => Err(BuildLibError::invalid_config(format!(
                "unknown mode '{other}', expected one of dist, dev, test"
            ))),
        }
    }
}

/// Watch flavour. Both are accepted; they behave the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchKind {
    Memory,
    #[default]
    File,
}

/// Which of serve and watch wins when both are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precedence {
    #[default]
    Serve,
    Watch,
}

/// What a single command run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Build,
    Watch,
    Serve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArgs {
    pub mode: Mode,
    pub watch: Option<WatchKind>,
    pub legacy: bool,
    pub serve: bool,
    pub port: u16,
    pub precedence: Precedence,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Dist,
            watch: None,
            legacy: false,
            serve: false,
            port: DEFAULT_PORT,
            precedence: Precedence::Serve,
        }
    }
}

impl BuildArgs {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn with_watch(mut self, watch: Option<WatchKind>) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_serve(mut self, serve: bool, port: u16) -> Self {
        self.serve = serve;
        self.port = port;
        self
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Resolve serve/watch flags into exactly one invocation
    pub fn invocation(&self) -> Invocation {
        match (self.serve, self.watch.is_some(), self.precedence) {
            (true, true, Precedence::Watch) => Invocation::Watch,
            (true, _, _) => Invocation::Serve,
            (false, true, _) => Invocation::Watch,
            (false, false, _) => Invocation::Build,
        }
    }

    /// Message shown under the status block while the process keeps running
    pub fn running_message(&self) -> String {
        match self.invocation() {
            Invocation::Serve => format!("Listening on port {}...", self.port),
            Invocation::Watch => "watching...".to_string(),
            Invocation::Build => String::new(),
        }
    }
}
