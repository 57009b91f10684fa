//! CSS processor chain configuration and CSS module naming.
//!
//! Two chains exist. Files ending in `.m.css` go through the module chain
//! (scoped class names, custom properties inlined and stripped, minified);
//! every other stylesheet goes through the variables chain (custom
//! properties kept, with computed fallbacks).

use crate::config::constants::{
    LEGACY_BROWSERS, MODERN_BROWSERS, SCOPED_HASH_LENGTH, SCOPED_NAME_PATTERN, THEME_KEY,
};
use crate::layout::is_css_module;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssChain {
    Module,
    Variables,
}

/// How custom property declarations are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomProperties {
    /// Inline `var()` references, then drop the declarations
    Strip,
    /// Keep the declarations and `var()` references, adding a computed
    /// fallback declaration in front of each reference
    Computed,
}

/// Modern-to-compatible CSS transforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetConfig {
    pub browsers: Vec<&'static str>,
    pub nesting_rules: bool,
    pub grid: bool,
}

impl PresetConfig {
    pub fn new(legacy: bool) -> Self {
        let browsers = if legacy {
            LEGACY_BROWSERS
        } else {
            MODERN_BROWSERS
        };
        Self {
            browsers: browsers.to_vec(),
            nesting_rules: true,
            grid: legacy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainConfig {
    pub chain: CssChain,
    pub resolve_imports: bool,
    pub preset: PresetConfig,
    /// Present only for the module chain
    pub scoped_name: Option<&'static str>,
    pub custom_properties: CustomProperties,
    pub minify: bool,
}

impl ChainConfig {
    pub fn module(legacy: bool) -> Self {
        Self {
            chain: CssChain::Module,
            resolve_imports: true,
            preset: PresetConfig::new(legacy),
            scoped_name: Some(SCOPED_NAME_PATTERN),
            custom_properties: CustomProperties::Strip,
            minify: true,
        }
    }

    pub fn variables(legacy: bool) -> Self {
        Self {
            chain: CssChain::Variables,
            resolve_imports: true,
            preset: PresetConfig::new(legacy),
            scoped_name: None,
            custom_properties: CustomProperties::Computed,
            minify: false,
        }
    }

    /// Select the chain for a file by its suffix
    pub fn for_file(path: &Path, legacy: bool) -> Self {
        if is_css_module(path) {
            Self::module(legacy)
        } else {
            Self::variables(legacy)
        }
    }
}

/// Short, identifier-safe hash of a stylesheet, stable for identical input
pub fn content_hash(source_key: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_key.as_bytes());
    hasher.update([0u8]);
    hasher.update(content.as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(hasher.finalize());
    encoded[..SCOPED_HASH_LENGTH].to_string()
}

/// Make a file stem usable as the start of a CSS class name
pub fn sanitize_ident(stem: &str) -> String {
    let mut ident: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Per-file naming template with only the local name left open, e.g.
/// `my-widget__[local]__a1B2c`
pub fn scoped_name_template(stem: &str, hash: &str) -> String {
    format!("{}__[local]__{hash}", sanitize_ident(stem))
}

/// `<name>__<local>__<hash>`
pub fn scoped_class_name(stem: &str, local: &str, hash: &str) -> String {
    scoped_name_template(stem, hash).replace("[local]", local)
}

/// Mapping written next to a CSS module: local names to scoped names plus the
/// theme key `<package>/<stem>`
pub fn module_mapping(
    classes: impl IntoIterator<Item = (String, String)>,
    package_name: &str,
    stem: &str,
) -> IndexMap<String, String> {
    let mut mapping: IndexMap<String, String> = classes.into_iter().collect();
    mapping.sort_keys();
    mapping.insert(THEME_KEY.to_string(), format!("{package_name}/{stem}"));
    mapping
}

/// Wrap a JSON value in a UMD module returning it
pub fn wrap_umd(content: &str) -> String {
    format!(
        "(function (root, factory) {{
if (typeof define === 'function' && define.amd) {{
	define([], function () {{ return (factory()); }});
}} else if (typeof module === 'object' && module.exports) {{
	module.exports = factory();
}}
}}(this, function () {{
	return {content};
}}));"
    )
}
