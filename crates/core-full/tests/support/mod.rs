// Shared fixtures: a fake tool runner and a small library project
#![allow(dead_code)]

use async_trait::async_trait;
use buildlib_core::error::Result;
use buildlib_core_full::{ToolOutcome, ToolRunner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

type Hook = Box<dyn Fn(&str, &[String]) + Send + Sync>;

/// Records invocations instead of starting processes
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<(String, Vec<String>)>>,
    outcomes: HashMap<String, ToolOutcome>,
    hooks: Vec<Hook>,
    delay: Option<Duration>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, tool: &str, outcome: ToolOutcome) -> Self {
        self.outcomes.insert(tool.to_string(), outcome);
        self
    }

    pub fn on_run(mut self, hook: impl Fn(&str, &[String]) + Send + Sync + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Emulate the compiler writing `src/index.js` into its `--outDir`
    pub fn emitting_js(self) -> Self {
        self.on_run(|tool, args| {
            if tool != "tsc" {
                return;
            }
            if let Some(out_dir) = out_dir(args) {
                let src = out_dir.join("src");
                std::fs::create_dir_all(src.join("widget")).unwrap();
                std::fs::write(src.join("index.js"), "export * from './widget/widget';").unwrap();
                std::fs::write(src.join("widget/widget.js"), "export default 1;").unwrap();
            }
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, tool: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == tool)
            .map(|(_, args)| args)
            .collect()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((tool.to_string(), args.to_vec()));
        for hook in &self.hooks {
            hook(tool, args);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.outcomes.get(tool).cloned().unwrap_or_else(ToolOutcome::ok))
    }
}

pub fn out_dir(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .position(|arg| arg == "--outDir")
        .and_then(|index| args.get(index + 1))
        .map(PathBuf::from)
}

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A component library with sources, tests, assets and stylesheets
pub fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", br#"{"name":"@acme/widgets","version":"1.0.0"}"#);
    write(root, "src/index.ts", b"export * from './widget/widget';");
    write(root, "src/widget/widget.ts", b"export default 1;");
    write(root, "src/widget/widget.m.css", b":root { --accent: #00ff00; }\n.root { color: var(--accent); }\n");
    write(root, "src/widget/widget.m.css.d.ts", b"export const root: string;");
    write(root, "src/widget/logo.png", &[0x89, b'P', b'N', b'G']);
    write(root, "src/theme/variables.css", b":root { --gap: 4px; }\n.box { margin: var(--gap); }\n");
    write(root, "src/fonts/icons.woff2", &[0u8; 16]);
    write(root, "tests/unit/all.ts", b"import '../../src/index';");
    write(root, "tests/unit/fixture.png", &[0u8; 8]);
    dir
}
