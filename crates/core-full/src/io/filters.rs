/// File filter implementations
use buildlib_core::layout::{is_asset_file, is_css_copy_file, is_css_file, is_watched_file};
use std::path::Path;

/// File filter trait
pub trait FileFilter: Send + Sync {
    fn should_include(&self, path: &Path) -> bool;
}

/// Images and fonts
pub struct AssetFilter;

impl FileFilter for AssetFilter {
    fn should_include(&self, path: &Path) -> bool {
        is_asset_file(path)
    }
}

/// `.css` and `.css.d.ts` sources
pub struct CssCopyFilter;

impl FileFilter for CssCopyFilter {
    fn should_include(&self, path: &Path) -> bool {
        is_css_copy_file(path)
    }
}

/// Stylesheets in the output tree
pub struct CssFilter;

impl FileFilter for CssFilter {
    fn should_include(&self, path: &Path) -> bool {
        is_css_file(path)
    }
}

/// Files that trigger a rebuild
pub struct WatchFilter;

impl FileFilter for WatchFilter {
    fn should_include(&self, path: &Path) -> bool {
        is_watched_file(path)
    }
}

pub struct AllFiles;

impl FileFilter for AllFiles {
    fn should_include(&self, _path: &Path) -> bool {
        true
    }
}
