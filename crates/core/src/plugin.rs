//! Host framework plugin surface: option registration and eject output

use crate::config::constants::DEFAULT_PORT;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Boolean,
    Number,
}

/// One command line option as registered with the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub alias: String,
    pub describe: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl OptionSpec {
    pub fn new(name: &str, alias: &str, describe: &str, kind: OptionKind) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.to_string(),
            describe: describe.to_string(),
            kind,
            default: None,
            choices: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// The five options accepted by the build command
pub fn build_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec::new("mode", "m", "the output mode", OptionKind::String)
            .with_default(json!("dist"))
            .with_choices(&["dist", "dev", "test"]),
        OptionSpec::new("watch", "w", "watch for file changes", OptionKind::String)
            .with_choices(&["memory", "file"]),
        OptionSpec::new(
            "legacy",
            "l",
            "build with legacy browser support",
            OptionKind::Boolean,
        ),
        OptionSpec::new("serve", "s", "start a web server", OptionKind::Boolean),
        OptionSpec::new("port", "p", "used in conjunction with the serve option", OptionKind::Number)
            .with_default(json!(DEFAULT_PORT)),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EjectCopy {
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EjectNpm {
    pub dev_dependencies: IndexMap<String, String>,
}

/// What the host copies into the project when the command is ejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EjectOutput {
    pub copy: EjectCopy,
    pub hints: Vec<String>,
    pub npm: EjectNpm,
}
