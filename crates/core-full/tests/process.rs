// Integration tests for running real processes
#![cfg(unix)]

use buildlib_core::ProjectLayout;
use buildlib_core::error::BuildLibError;
use buildlib_core_full::{ProcessRunner, ToolRunner};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

fn install_tool(base: &Path, name: &str, script: &str) {
    let bin = base.join("node_modules/.bin");
    std::fs::create_dir_all(&bin).unwrap();
    let path = bin.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_failing_tool_lines_in_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    install_tool(
        dir.path(),
        "tsc",
        "echo one\nsleep 0.2\necho two >&2\nsleep 0.2\necho three\nexit 2",
    );
    let runner = ProcessRunner::new(ProjectLayout::new(dir.path()));

    let outcome = runner.run("tsc", &[]).await.unwrap();
    assert_eq!(outcome.code, Some(2));
    assert_eq!(outcome.into_errors(), vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_non_utf8_line_keeps_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    install_tool(
        dir.path(),
        "tsc",
        "echo first\nprintf 'caf\\351.ts: error\\n'\necho 'src/b.ts(1,1): error TS1005'\nexit 2",
    );
    let runner = ProcessRunner::new(ProjectLayout::new(dir.path()));

    let outcome = runner.run("tsc", &[]).await.unwrap();
    assert_eq!(
        outcome.into_errors(),
        vec!["first", "caf\u{fffd}.ts: error", "src/b.ts(1,1): error TS1005"]
    );
}

#[tokio::test]
async fn test_long_output_after_non_utf8_line_completes() {
    let dir = tempfile::tempdir().unwrap();
    install_tool(
        dir.path(),
        "tsc",
        "printf '\\377\\n'\ni=0\nwhile [ $i -lt 4000 ]; do echo \"src/a.ts($i,1): error TS1005\"; i=$((i+1)); done\nexit 1",
    );
    let runner = ProcessRunner::new(ProjectLayout::new(dir.path()));

    let outcome = tokio::time::timeout(Duration::from_secs(10), runner.run("tsc", &[]))
        .await
        .expect("tool run did not finish")
        .unwrap();
    let errors = outcome.into_errors();
    assert_eq!(errors.len(), 4001);
    assert_eq!(errors[4000], "src/a.ts(3999,1): error TS1005");
}

#[tokio::test]
async fn test_arguments_and_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    install_tool(dir.path(), "tcm", "pwd\necho \"$@\"");
    let runner = ProcessRunner::new(ProjectLayout::new(dir.path()));

    let outcome = runner
        .run("tcm", &["src".to_string(), "*.m.css".to_string()])
        .await
        .unwrap();
    assert!(outcome.success());
    let cwd = std::fs::canonicalize(dir.path()).unwrap();
    assert_eq!(
        std::fs::canonicalize(&outcome.output[0]).unwrap(),
        cwd
    );
    assert_eq!(outcome.output[1], "src *.m.css");
    assert!(outcome.into_errors().is_empty());
}

#[tokio::test]
async fn test_missing_tool_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ProcessRunner::new(ProjectLayout::new(dir.path()));

    let err = runner.run("tsc", &[]).await.unwrap_err();
    assert!(matches!(err, BuildLibError::Spawn { ref tool, .. } if tool == "tsc"));
}
