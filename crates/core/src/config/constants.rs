//! Constants for build-lib

/// Name this tool is published and reported under
pub const TOOL_NAME: &str = "build-lib";

/// Binary asset extensions copied verbatim into the output tree
pub const ASSET_EXTENSIONS: &[&str] = &[
    "gif", "png", "jpg", "jpeg", "svg", "eot", "ttf", "woff", "woff2",
];

/// Source extensions that are compiled or post-processed
pub const SOURCE_EXTENSIONS: &[&str] = &["css", "ts"];

/// Raw stylesheet suffixes copied before CSS post-processing
pub const CSS_SUFFIXES: &[&str] = &[".css", ".css.d.ts"];

/// Suffix marking a CSS module
pub const CSS_MODULE_SUFFIX: &str = ".m.css";

/// Project source directory
pub const SRC_DIR: &str = "src";

/// Project tests directory (test mode only)
pub const TESTS_DIR: &str = "tests";

/// Build output root
pub const OUTPUT_DIR: &str = "output";

/// Compiler staging directory inside the output directory
pub const TMP_DIR: &str = "tmp";

/// Locally installed tool binaries
pub const TOOL_BIN_DIR: &str = "node_modules/.bin";

/// Type-checking compiler
pub const COMPILER: &str = "tsc";

/// CSS module typings generator
pub const CSS_TYPINGS_GENERATOR: &str = "tcm";

/// npm packages providing the external tools
pub const COMPILER_PACKAGE: &str = "typescript";
pub const CSS_TYPINGS_PACKAGE: &str = "typed-css-modules";

/// Scoped class name template for CSS modules
pub const SCOPED_NAME_PATTERN: &str = "[name]__[local]__[hash:base64:5]";

/// Length of the class name hash
pub const SCOPED_HASH_LENGTH: usize = 5;

/// Synthetic key added to CSS module mapping files
pub const THEME_KEY: &str = " _key";

/// Host configuration file
pub const RC_FILE: &str = ".dojorc";

/// Command group and name as registered with the host
pub const COMMAND_GROUP: &str = "build";
pub const COMMAND_NAME: &str = "lib";

/// Options file written by eject
pub const EJECTED_OPTIONS_FILE: &str = "build-options.json";

/// Script written by eject
pub const EJECTED_SCRIPT: &str = "build-lib";

/// Directory (relative to the project) the host copies ejected files into
pub const EJECT_CONFIG_DIR: &str = "config";

/// Default port for serve mode
pub const DEFAULT_PORT: u16 = 9999;

/// Browser targets for the CSS preset
pub const MODERN_BROWSERS: &[&str] = &["last 2 versions"];
pub const LEGACY_BROWSERS: &[&str] = &["last 2 versions", "ie >= 10"];

/// Extensions observed in watch mode
pub fn watched_extensions() -> impl Iterator<Item = &'static str> {
    ASSET_EXTENSIONS
        .iter()
        .chain(SOURCE_EXTENSIONS.iter())
        .copied()
}

/// Host key for this command's rc block, e.g. `build-lib`
pub fn command_key() -> String {
    format!("{COMMAND_GROUP}-{COMMAND_NAME}")
}
