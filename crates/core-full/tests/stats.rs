// Integration tests for the output manifest
use buildlib_core::{AssetEntry, ErrorList, Stage};
use buildlib_core_full::stats::generate_stats;
use std::path::MAIN_SEPARATOR;

#[tokio::test]
async fn test_directory_sizes_are_aggregated() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output/dist");
    std::fs::create_dir_all(output.join("my-widget/styles")).unwrap();
    std::fs::write(output.join("my-widget/styles/my-widget.m.css"), vec![b'a'; 1000]).unwrap();
    std::fs::write(output.join("my-widget/my-widget.js"), vec![b'b'; 1000]).unwrap();
    std::fs::write(output.join("index.js"), vec![b'c'; 1000]).unwrap();

    let report = generate_stats(&output, ErrorList::new()).await.unwrap();

    assert_eq!(report.output_path, output);
    assert_eq!(
        report.assets,
        vec![
            AssetEntry::new("index.js", 1000),
            AssetEntry::new(format!("my-widget{MAIN_SEPARATOR}"), 2000),
        ]
    );
    assert!(report.assets[1].is_directory());
    assert!(!report.assets[0].is_directory());
}

#[tokio::test]
async fn test_errors_carried_through() {
    let dir = tempfile::tempdir().unwrap();
    let mut errors = ErrorList::new();
    errors.push(Stage::Clean, "EACCES");
    errors.push(Stage::Compile, "TS2307");

    let report = generate_stats(dir.path(), errors.clone()).await.unwrap();
    assert_eq!(report.errors, errors);
    assert!(report.assets.is_empty());
}

#[tokio::test]
async fn test_empty_directory_entry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("empty")).unwrap();

    let report = generate_stats(dir.path(), ErrorList::new()).await.unwrap();
    assert_eq!(
        report.assets,
        vec![AssetEntry::new(format!("empty{MAIN_SEPARATOR}"), 0)]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_entry_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // dangling symlink: listed but cannot be stat'ed
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();

    let err = generate_stats(dir.path(), ErrorList::new()).await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to read output statistics"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_linked_directory_cycle_is_not_followed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("pkg")).unwrap();
    std::fs::write(dir.path().join("pkg/index.js"), vec![b'a'; 100]).unwrap();
    std::os::unix::fs::symlink(dir.path().join("pkg"), dir.path().join("pkg/self")).unwrap();

    let report = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        generate_stats(dir.path(), ErrorList::new()),
    )
    .await
    .expect("walk terminates")
    .unwrap();
    assert_eq!(
        report.assets,
        vec![AssetEntry::new(format!("pkg{MAIN_SEPARATOR}"), 100)]
    );
}
