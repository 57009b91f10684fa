//! Build results: soft stage failures and the output manifest

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage that produced a soft failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Clean,
    CssTypings,
    Compile,
    Assets,
    CssCopy,
    Css,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::CssTypings => "css-typings",
            Stage::Compile => "compile",
            Stage::Assets => "assets",
            Stage::CssCopy => "css-copy",
            Stage::Css => "css",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

impl StageError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered, append-only record of the soft failures of one build attempt.
/// Never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<StageError>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, stage: Stage, message: impl Into<String>) {
        self.0.push(StageError::new(stage, message));
    }

    pub fn extend_lines<I, S>(&mut self, stage: Stage, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push(stage, line);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageError> {
        self.0.iter()
    }

    pub fn by_stage(&self, stage: Stage) -> impl Iterator<Item = &StageError> {
        self.0.iter().filter(move |e| e.stage == stage)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }
}

impl std::ops::Index<usize> for ErrorList {
    type Output = StageError;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a StageError;
    type IntoIter = std::slice::Iter<'a, StageError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One top-level entry of the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Directory names end with the path separator
    pub name: String,
    pub size: u64,
}

impl AssetEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.name.ends_with(std::path::MAIN_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub output_path: PathBuf,
    pub assets: Vec<AssetEntry>,
    pub errors: ErrorList,
}

impl StatsReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
