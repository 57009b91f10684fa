//! Output manifest: top-level entries of the output directory with sizes

use buildlib_core::error::{BuildLibError, Result};
use buildlib_core::{AssetEntry, ErrorList, StatsReport};
use std::future::Future;
use std::io;
use std::path::{MAIN_SEPARATOR, Path};
use std::pin::Pin;
use tracing::debug;

/// Build the report for `output_dir`. A missing directory yields an empty
/// manifest; any other failure to read the tree is fatal.
pub async fn generate_stats(output_dir: &Path, errors: ErrorList) -> Result<StatsReport> {
    let assets = match tokio::fs::metadata(output_dir).await {
        Ok(_) => top_level_entries(output_dir)
            .await
            .map_err(|e| BuildLibError::stats(output_dir, e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Output directory {:?} does not exist", output_dir);
            Vec::new()
        }
        Err(e) => return Err(BuildLibError::stats(output_dir, e)),
    };

    Ok(StatsReport {
        output_path: output_dir.to_path_buf(),
        assets,
        errors,
    })
}

async fn top_level_entries(dir: &Path) -> io::Result<Vec<AssetEntry>> {
    let mut assets = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let metadata = tokio::fs::metadata(&path).await?;

        if metadata.is_dir() {
            let size = directory_size(&path).await?;
            assets.push(AssetEntry::new(format!("{name}{MAIN_SEPARATOR}"), size));
        } else {
            assets.push(AssetEntry::new(name, metadata.len()));
        }
    }

    assets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(assets)
}

/// Recursive sum of the sizes of all files below `dir`. Linked directories
/// below `dir` are not followed.
pub fn directory_size(dir: &Path) -> Pin<Box<dyn Future<Output = io::Result<u64>> + Send + '_>> {
    Box::pin(async move {
        let mut total = 0;
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = tokio::fs::metadata(&path).await?;
            if metadata.is_dir() && entry.file_type().await?.is_symlink() {
                debug!("Not following linked directory {:?}", path);
            } else if metadata.is_dir() {
                total += directory_size(&path).await?;
            } else {
                total += metadata.len();
            }
        }

        Ok(total)
    })
}
