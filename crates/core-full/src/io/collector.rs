use super::filters::FileFilter;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Walks source roots and keeps the files a filter accepts
pub struct FileCollector<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> FileCollector<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Matching files below `roots`, sorted by path. A root may itself be a
    /// file; roots that do not exist contribute nothing.
    pub async fn collect_async(&self, roots: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending: Vec<PathBuf> = Vec::new();

        for root in roots {
            if root.is_dir() {
                pending.push(root.clone());
            } else if root.is_file() && self.filter.should_include(root) {
                files.push(root.clone());
            }
        }

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_symlink() && path.is_dir() {
                    // linked directories are not followed, a link back up would never end
                    debug!("Skipping linked directory {:?}", path);
                } else if self.filter.should_include(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}
