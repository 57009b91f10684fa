// File system operations used by the build stages.
// Failures are returned as plain io errors so stages can record their messages.

pub mod collector;
pub mod filters;

pub use collector::FileCollector;
pub use filters::{AllFiles, AssetFilter, CssCopyFilter, CssFilter, FileFilter, WatchFilter};

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Remove a directory tree; a missing directory is not an error
pub async fn remove_dir_if_exists(dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            debug!("Removed {:?}", dir);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copy `files` into `dest`, keeping each file's path relative to `base`
pub async fn copy_files(files: &[PathBuf], base: &Path, dest: &Path) -> io::Result<usize> {
    for file in files {
        let relative = file.strip_prefix(base).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is outside {}", file.display(), base.display()),
            )
        })?;
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &target).await?;
    }
    Ok(files.len())
}

/// Copy the files under `roots` accepted by `filter` into `dest`, relative to `base`
pub async fn copy_matching<F: FileFilter>(
    filter: F,
    roots: &[PathBuf],
    base: &Path,
    dest: &Path,
) -> io::Result<usize> {
    let files = FileCollector::new(filter).collect_async(roots).await?;
    let copied = copy_files(&files, base, dest).await?;
    debug!("Copied {} files into {:?}", copied, dest);
    Ok(copied)
}

/// Copy a whole directory tree into `dest`
pub async fn copy_tree(src: &Path, dest: &Path) -> io::Result<usize> {
    copy_matching(AllFiles, &[src.to_path_buf()], src, dest).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_dir_if_exists(&dir.path().join("absent")).await.is_ok());
    }

    #[tokio::test]
    async fn test_copy_tree_keeps_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("tmp/src");
        std::fs::create_dir_all(src.join("widget")).unwrap();
        std::fs::write(src.join("index.js"), "export {};").unwrap();
        std::fs::write(src.join("widget/widget.js"), "export {};").unwrap();

        let dest = dir.path().join("out");
        let copied = copy_tree(&src, &dest).await.unwrap();

        assert_eq!(copied, 2);
        assert!(dest.join("index.js").is_file());
        assert!(dest.join("widget/widget.js").is_file());
    }

    #[tokio::test]
    async fn test_copy_tree_of_missing_dir_copies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let copied = copy_tree(&dir.path().join("none"), &dir.path().join("out"))
            .await
            .unwrap();
        assert_eq!(copied, 0);
    }
}
