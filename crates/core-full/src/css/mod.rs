//! CSS post-processing of the output tree.
//!
//! Every stylesheet is rewritten in place. CSS modules also get a `<file>.js`
//! companion exporting their class name mapping.

pub mod custom_properties;
pub mod grid;
pub mod processor;

pub use processor::{CssProcessor, ProcessedCss};

use crate::io::{CssFilter, FileCollector};
use buildlib_core::css::{ChainConfig, module_mapping, wrap_umd};
use buildlib_core::layout::{css_module_stem, is_css_module};
use buildlib_core::{ErrorList, Stage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Process all stylesheets below `output_dir`, module files first.
/// Each file that fails adds one `css` stage error.
pub async fn process_output_css(
    output_dir: &Path,
    package_json: &Path,
    legacy: bool,
    errors: &mut ErrorList,
) {
    let files = match FileCollector::new(CssFilter)
        .collect_async(&[output_dir.to_path_buf()])
        .await
    {
        Ok(files) => files,
        Err(e) => {
            errors.push(Stage::Css, e.to_string());
            return;
        }
    };
    let (modules, variables): (Vec<PathBuf>, Vec<PathBuf>) =
        files.into_iter().partition(|file| is_css_module(file));
    debug!(
        "Processing {} module and {} variable stylesheets",
        modules.len(),
        variables.len()
    );

    if !modules.is_empty() {
        match read_package_name(package_json).await {
            Ok(package_name) => {
                run_chain(
                    ChainConfig::module(legacy),
                    &modules,
                    output_dir,
                    Some(&package_name),
                    errors,
                )
                .await
            }
            Err(message) => errors.push(Stage::Css, message),
        }
    }

    if !variables.is_empty() {
        run_chain(
            ChainConfig::variables(legacy),
            &variables,
            output_dir,
            None,
            errors,
        )
        .await;
    }
}

async fn run_chain(
    config: ChainConfig,
    files: &[PathBuf],
    output_dir: &Path,
    package_name: Option<&str>,
    errors: &mut ErrorList,
) {
    let processor = match CssProcessor::new(config) {
        Ok(processor) => processor,
        Err(message) => {
            errors.push(Stage::Css, message);
            return;
        }
    };

    for file in files {
        if let Err(message) = process_file(&processor, file, output_dir, package_name).await {
            warn!("CSS processing failed for {:?}: {}", file, message);
            errors.push(Stage::Css, format!("{}: {}", file.display(), message));
        }
    }
}

async fn process_file(
    processor: &CssProcessor,
    file: &Path,
    output_dir: &Path,
    package_name: Option<&str>,
) -> Result<(), String> {
    let source_key = file
        .strip_prefix(output_dir)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/");
    let processed = processor.process(file, &source_key)?;

    tokio::fs::write(file, &processed.code)
        .await
        .map_err(|e| e.to_string())?;

    if let Some(package_name) = package_name {
        let mapping = module_mapping(processed.classes, package_name, &css_module_stem(file));
        let json = serde_json::to_string(&mapping).map_err(|e| e.to_string())?;
        let mut companion = file.as_os_str().to_owned();
        companion.push(".js");
        tokio::fs::write(PathBuf::from(companion), wrap_umd(&json))
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// `name` from the project's package.json
pub async fn read_package_name(package_json: &Path) -> Result<String, String> {
    let content = tokio::fs::read_to_string(package_json)
        .await
        .map_err(|e| format!("Failed reading {}: {}", package_json.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed reading {}: {}", package_json.display(), e))?;
    value
        .get("name")
        .and_then(|name| name.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("{} has no name", package_json.display()))
}
