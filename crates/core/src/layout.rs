//! Project file system layout: where sources are read and output is written

use crate::args::Mode;
use crate::config::constants::{
    ASSET_EXTENSIONS, CSS_MODULE_SUFFIX, CSS_SUFFIXES, EJECT_CONFIG_DIR, OUTPUT_DIR, RC_FILE,
    SRC_DIR, TESTS_DIR, TMP_DIR, TOOL_BIN_DIR, watched_extensions,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base: PathBuf,
}

impl ProjectLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn src_dir(&self) -> PathBuf {
        self.base.join(SRC_DIR)
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.base.join(TESTS_DIR)
    }

    /// `output/<mode>`
    pub fn output_dir(&self, mode: Mode) -> PathBuf {
        self.base.join(OUTPUT_DIR).join(mode.as_str())
    }

    /// `output/<mode>/tmp`, the compiler staging area outside test mode
    pub fn tmp_dir(&self, mode: Mode) -> PathBuf {
        self.output_dir(mode).join(TMP_DIR)
    }

    /// Where the compiler writes: straight to the output in test mode
    pub fn compiler_out_dir(&self, mode: Mode) -> PathBuf {
        if mode.is_test() {
            self.output_dir(mode)
        } else {
            self.tmp_dir(mode)
        }
    }

    /// Compiled library sources inside the staging area
    pub fn staged_src_dir(&self, mode: Mode) -> PathBuf {
        self.tmp_dir(mode).join(SRC_DIR)
    }

    /// Source trees read for `mode`; tests are included only in test mode
    pub fn source_roots(&self, mode: Mode) -> Vec<PathBuf> {
        if mode.is_test() {
            vec![self.src_dir(), self.tests_dir()]
        } else {
            vec![self.src_dir()]
        }
    }

    /// Relative paths of copied files are taken from here. Test mode keeps the
    /// `src/` and `tests/` prefixes so copies line up with compiler output.
    pub fn copy_base(&self, mode: Mode) -> PathBuf {
        if mode.is_test() {
            self.base.clone()
        } else {
            self.src_dir()
        }
    }

    pub fn tool_path(&self, tool: &str) -> PathBuf {
        self.base.join(TOOL_BIN_DIR).join(tool)
    }

    pub fn rc_path(&self) -> PathBuf {
        self.base.join(RC_FILE)
    }

    pub fn package_json(&self) -> PathBuf {
        self.base.join("package.json")
    }

    /// Directory the host copies ejected files into, e.g. `config/build-lib`
    pub fn eject_dir(&self, command_key: &str) -> PathBuf {
        self.base.join(EJECT_CONFIG_DIR).join(command_key)
    }

    /// Human readable glob for the asset copy, for diagnostics
    pub fn asset_pattern(&self, mode: Mode) -> String {
        format!(
            "{}/**/*.{{{}}}",
            self.roots_pattern(mode),
            ASSET_EXTENSIONS.join(",")
        )
    }

    /// Human readable glob for the raw CSS copy, for diagnostics
    pub fn css_pattern(&self, mode: Mode) -> String {
        format!("{}/**/*.{{css,css.d.ts}}", self.roots_pattern(mode))
    }

    /// Human readable glob for the watcher, for diagnostics
    pub fn watch_pattern(&self, mode: Mode) -> String {
        let extensions: Vec<&str> = watched_extensions().collect();
        format!(
            "{}/**/*.{{{}}}",
            self.roots_pattern(mode),
            extensions.join(",")
        )
    }

    fn roots_pattern(&self, mode: Mode) -> String {
        if mode.is_test() {
            format!("{}/{{{SRC_DIR},{TESTS_DIR}}}", self.base.display())
        } else {
            self.src_dir().display().to_string()
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Image and font files copied verbatim
pub fn is_asset_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.as_str()))
}

/// `.css` and `.css.d.ts` files copied ahead of CSS post-processing
pub fn is_css_copy_file(path: &Path) -> bool {
    file_name(path).is_some_and(|name| CSS_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Any stylesheet
pub fn is_css_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "css")
}

pub fn is_css_module(path: &Path) -> bool {
    file_name(path).is_some_and(|name| name.ends_with(CSS_MODULE_SUFFIX))
}

/// Files whose change triggers a rebuild in watch mode
pub fn is_watched_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| watched_extensions().any(|watched| watched == ext))
}

/// File base name without the `.m.css` suffix
pub fn css_module_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(CSS_MODULE_SUFFIX)
        .or_else(|| name.strip_suffix(".css"))
        .unwrap_or(&name)
        .to_string()
}
