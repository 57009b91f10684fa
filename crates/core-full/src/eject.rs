//! Eject: move this command's options and a launcher script into the project

use crate::rc::read_rc;
use buildlib_core::ProjectLayout;
use buildlib_core::config::constants::{
    COMPILER_PACKAGE, CSS_TYPINGS_PACKAGE, EJECTED_OPTIONS_FILE, EJECTED_SCRIPT,
};
use buildlib_core::error::{BuildLibError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Clear the rc block for `key` and return what it held
fn clear_build_options(layout: &ProjectLayout, key: &str) -> Result<Value> {
    let rc_path = layout.rc_path();
    if !rc_path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let mut rc = read_rc(&rc_path)?;
    let rc_object = rc
        .as_object_mut()
        .ok_or_else(|| BuildLibError::invalid_config(format!("{} is not an object", rc_path.display())))?;
    let config = rc_object
        .insert(key.to_string(), Value::Object(Default::default()))
        .filter(|value| !value.is_null())
        .unwrap_or_else(|| Value::Object(Default::default()));

    std::fs::write(&rc_path, serde_json::to_string(&rc)?)?;
    debug!("Cleared '{}' from {:?}", key, rc_path);
    Ok(config)
}

/// Move the rc block for `key` into `build-options.json` inside `into`
pub fn move_build_options(layout: &ProjectLayout, key: &str, into: &Path) -> Result<PathBuf> {
    let options = clear_build_options(layout, key)?;
    let path = into.join(EJECTED_OPTIONS_FILE);
    std::fs::write(&path, serde_json::to_string(&options)?)?;
    Ok(path)
}

/// Launcher script running this binary's build against the ejected options
pub fn ejected_script(executable: &Path, eject_dir: &Path) -> String {
    format!(
        "#!/bin/sh\nexec \"{}\" build --config \"{}\" \"$@\"\n",
        executable.display(),
        eject_dir.join(EJECTED_OPTIONS_FILE).display()
    )
}

/// Write the launcher script into `into` and link `<base>/build-lib` to where
/// the host will copy it. A failed link is logged only.
pub fn create_and_link_ejected_build_file(
    layout: &ProjectLayout,
    eject_dir: &Path,
    into: &Path,
) -> Result<PathBuf> {
    let executable = std::env::current_exe()?;
    let script = into.join(EJECTED_SCRIPT);
    std::fs::write(&script, ejected_script(&executable, eject_dir))?;
    make_executable(&script)?;

    if let Err(e) = link(
        &eject_dir.join(EJECTED_SCRIPT),
        &layout.base().join(EJECTED_SCRIPT),
    ) {
        error!("{}", e);
    }
    Ok(script)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn link(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn link(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

/// `tool` at `version` plus the external tools at the ranges the project
/// declares
pub fn build_npm_dependencies(
    layout: &ProjectLayout,
    tool: &str,
    version: &str,
) -> Result<IndexMap<String, String>> {
    let fail = |reason: String| {
        BuildLibError::eject(format!("Failed reading dependencies from package.json - {reason}"))
    };
    let content = std::fs::read_to_string(layout.package_json()).map_err(|e| fail(e.to_string()))?;
    let package: Value = serde_json::from_str(&content).map_err(|e| fail(e.to_string()))?;

    let mut dependencies = IndexMap::new();
    dependencies.insert(tool.to_string(), version.to_string());
    for name in [COMPILER_PACKAGE, CSS_TYPINGS_PACKAGE] {
        let range = ["devDependencies", "dependencies"]
            .iter()
            .find_map(|section| package.get(section)?.get(name)?.as_str())
            .unwrap_or("*");
        dependencies.insert(name.to_string(), range.to_string());
    }
    Ok(dependencies)
}
