//! External tool invocation.
//!
//! A non-zero exit is not an error: the captured output lines are handed back
//! so the caller can record them as stage failures. Only failing to start the
//! tool at all is fatal.

use async_trait::async_trait;
use buildlib_core::ProjectLayout;
use buildlib_core::error::{BuildLibError, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code and combined stdout/stderr lines, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutcome {
    pub code: Option<i32>,
    pub output: Vec<String>,
}

impl ToolOutcome {
    pub fn new(code: Option<i32>, output: Vec<String>) -> Self {
        Self { code, output }
    }

    pub fn ok() -> Self {
        Self::new(Some(0), Vec::new())
    }

    /// A tool killed by a signal has no code and counts as failed
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Lines to record as errors: none on success, everything otherwise
    pub fn into_errors(self) -> Vec<String> {
        if self.success() {
            Vec::new()
        } else {
            self.output
        }
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutcome>;
}

/// Runs tools installed in the project's `node_modules/.bin`
pub struct ProcessRunner {
    layout: ProjectLayout,
}

impl ProcessRunner {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    fn command(&self, tool: &str) -> Command {
        let program = self.layout.tool_path(tool);
        let mut command = if cfg!(windows) {
            let mut shell = Command::new("cmd");
            shell.arg("/C").arg(program);
            shell
        } else {
            Command::new(program)
        };
        command
            .current_dir(self.layout.base())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, tool: &str, args: &[String]) -> Result<ToolOutcome> {
        debug!("Running {} {:?}", tool, args);

        let mut child = self
            .command(tool)
            .args(args)
            .spawn()
            .map_err(|e| BuildLibError::spawn(tool, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BuildLibError::other(format!("{tool}: stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BuildLibError::other(format!("{tool}: stderr not captured")))?;

        let mut stdout = BufReader::new(stdout).split(b'\n');
        let mut stderr = BufReader::new(stderr).split(b'\n');
        let mut output = Vec::new();
        let (mut stdout_done, mut stderr_done) = (false, false);

        while !(stdout_done && stderr_done) {
            tokio::select! {
                segment = stdout.next_segment(), if !stdout_done => {
                    stdout_done = take_line(tool, "stdout", segment, &mut output);
                },
                segment = stderr.next_segment(), if !stderr_done => {
                    stderr_done = take_line(tool, "stderr", segment, &mut output);
                },
            }
        }

        let status = child.wait().await?;
        debug!("{} exited with {:?}", tool, status.code());
        Ok(ToolOutcome::new(status.code(), output))
    }
}

/// Push one raw output line, decoded lossily. Returns true once the stream
/// is finished.
fn take_line(
    tool: &str,
    stream: &str,
    segment: std::io::Result<Option<Vec<u8>>>,
    output: &mut Vec<String>,
) -> bool {
    match segment {
        Ok(Some(mut bytes)) => {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            output.push(String::from_utf8_lossy(&bytes).into_owned());
            false
        }
        Ok(None) => true,
        Err(e) => {
            warn!("{}: failed reading {}: {}", tool, stream, e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_errors() {
        let ok = ToolOutcome::new(Some(0), vec!["noise".to_string()]);
        assert!(ok.success());
        assert!(ok.into_errors().is_empty());

        let failed = ToolOutcome::new(Some(2), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(failed.into_errors(), vec!["a", "b"]);

        let killed = ToolOutcome::new(None, vec!["partial".to_string()]);
        assert!(!killed.success());
    }

    #[test]
    fn test_take_line_decodes_lossily() {
        let mut output = Vec::new();
        assert!(!take_line("tsc", "stdout", Ok(Some(b"caf\xe9.ts: error\r".to_vec())), &mut output));
        assert!(take_line("tsc", "stdout", Ok(None), &mut output));
        assert_eq!(output, vec!["caf\u{fffd}.ts: error"]);
    }
}
