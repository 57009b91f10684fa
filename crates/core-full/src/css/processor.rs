use super::{custom_properties, grid};
use buildlib_core::css::{ChainConfig, CustomProperties, content_hash, scoped_name_template};
use buildlib_core::layout::css_module_stem;
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::css_modules::{Config as CssModulesConfig, CssModuleReference, Pattern};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use std::path::Path;

/// Processed stylesheet plus, for CSS modules, local to scoped class names
#[derive(Debug, Clone, Default)]
pub struct ProcessedCss {
    pub code: String,
    pub classes: Vec<(String, String)>,
}

/// One processor chain, bound to browser targets
pub struct CssProcessor {
    config: ChainConfig,
    targets: Targets,
}

impl CssProcessor {
    pub fn new(config: ChainConfig) -> Result<Self, String> {
        let browsers = Browsers::from_browserslist(config.preset.browsers.iter().copied())
            .map_err(|e| format!("invalid browser targets: {e}"))?;
        Ok(Self {
            config,
            targets: Targets {
                browsers,
                ..Targets::default()
            },
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Process `path`. `source_key` identifies the file for class name hashing.
    ///
    /// Imports are inlined first so classes pulled in through `@import` are
    /// scoped and exported along with the file's own.
    pub fn process(&self, path: &Path, source_key: &str) -> Result<ProcessedCss, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let filename = path.to_string_lossy().into_owned();

        let provider = FileProvider::new();
        let source = if self.config.resolve_imports {
            let options = ParserOptions {
                filename: filename.clone(),
                ..ParserOptions::default()
            };
            let mut bundler = Bundler::new(&provider, None, options);
            let bundled = bundler.bundle(path).map_err(|e| e.to_string())?;
            bundled
                .to_css(PrinterOptions::default())
                .map_err(|e| e.to_string())?
                .code
        } else {
            content.clone()
        };

        let template = self.config.scoped_name.map(|_| {
            scoped_name_template(&css_module_stem(path), &content_hash(source_key, &content))
        });
        let css_modules = match &template {
            Some(template) => Some(CssModulesConfig {
                pattern: Pattern::parse(template).map_err(|e| e.to_string())?,
                ..CssModulesConfig::default()
            }),
            None => None,
        };
        let options = ParserOptions {
            filename,
            css_modules,
            ..ParserOptions::default()
        };
        let mut stylesheet = StyleSheet::parse(&source, options).map_err(|e| e.to_string())?;

        let variables = custom_properties::collect_root_variables(&stylesheet.rules);
        if self.config.custom_properties == CustomProperties::Strip {
            custom_properties::apply(&mut stylesheet.rules, &variables, CustomProperties::Strip);
        }

        stylesheet
            .minify(MinifyOptions {
                targets: self.targets.clone(),
                ..MinifyOptions::default()
            })
            .map_err(|e| e.to_string())?;

        // after minify, which would merge the fallbacks into their originals
        if self.config.custom_properties == CustomProperties::Computed {
            custom_properties::apply(&mut stylesheet.rules, &variables, CustomProperties::Computed);
        }
        if self.config.preset.grid {
            grid::prefix_grid(&mut stylesheet.rules);
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: self.config.minify,
                targets: self.targets.clone(),
                ..PrinterOptions::default()
            })
            .map_err(|e| e.to_string())?;

        let classes = result
            .exports
            .map(|exports| {
                exports
                    .into_iter()
                    .map(|(local, export)| {
                        let mut names = vec![export.name];
                        for reference in export.composes {
                            names.push(match reference {
                                CssModuleReference::Local { name } => name,
                                CssModuleReference::Global { name } => name,
                                CssModuleReference::Dependency { name, .. } => name,
                            });
                        }
                        (local, names.join(" "))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProcessedCss {
            code: result.code,
            classes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn process(name: &str, css: &str) -> ProcessedCss {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, css).unwrap();
        let processor = CssProcessor::new(ChainConfig::for_file(&path, false)).unwrap();
        processor.process(&path, name).unwrap()
    }

    #[test]
    fn test_module_chain_scopes_classes() {
        let processed = process("button.m.css", ".root { color: red; }");
        assert_eq!(processed.classes.len(), 1);

        let (local, scoped) = &processed.classes[0];
        assert_eq!(local, "root");
        assert!(scoped.starts_with("button__root__"), "{scoped}");
        assert_eq!(scoped.len(), "button__root__".len() + 5);
        assert!(processed.code.contains(&format!(".{scoped}")));
    }

    #[test]
    fn test_module_chain_inlines_and_strips_variables() {
        let processed = process(
            "theme.m.css",
            ":root { --main: #ff0000; }\n.root { color: var(--main); }",
        );
        assert!(!processed.code.contains("--main"), "{}", processed.code);
        assert!(!processed.code.contains(":root"), "{}", processed.code);
        assert!(!processed.code.contains("var("), "{}", processed.code);
        // minified
        assert!(!processed.code.contains('\n'), "{}", processed.code);
    }

    /// Declarations of the first rule whose selector starts with `selector`
    fn block<'a>(code: &'a str, selector: &str) -> &'a str {
        let start = code.find(selector).expect("selector present");
        let open = start + code[start..].find('{').unwrap();
        let close = open + code[open..].find('}').unwrap();
        &code[open + 1..close]
    }

    #[test]
    fn test_variables_chain_keeps_variables() {
        let processed = process(
            "variables.css",
            ":root { --gap: 4px; --fg: #123456; }\n.box { margin: var(--gap); color: var(--fg); }",
        );
        assert!(processed.classes.is_empty());
        assert!(processed.code.contains("--gap"), "{}", processed.code);

        let declarations = block(&processed.code, ".box");
        let margin = declarations.find("margin: 4px").expect(&processed.code);
        let margin_var = declarations.find("margin: var(--gap)").expect(&processed.code);
        let color = declarations.find("color: #123456").expect(&processed.code);
        let color_var = declarations.find("color: var(--fg)").expect(&processed.code);
        assert!(margin < margin_var);
        assert!(color < color_var);
    }

    #[test]
    fn test_module_chain_exports_imported_classes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.m.css"), ".shared { color: blue; }").unwrap();
        let path = dir.path().join("button.m.css");
        fs::write(&path, "@import \"base.m.css\";\n.root { color: red; }").unwrap();

        let processor = CssProcessor::new(ChainConfig::module(false)).unwrap();
        let processed = processor.process(&path, "button.m.css").unwrap();

        let mut locals: Vec<&str> = processed.classes.iter().map(|(local, _)| local.as_str()).collect();
        locals.sort();
        assert_eq!(locals, vec!["root", "shared"]);
        for (_, scoped) in &processed.classes {
            assert!(scoped.starts_with("button__"), "{scoped}");
            assert!(processed.code.contains(&format!(".{scoped}")), "{}", processed.code);
        }
    }

    #[test]
    fn test_legacy_module_chain_prefixes_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.m.css");
        fs::write(
            &path,
            ".root { display: grid; grid-template-columns: 1fr 1fr; grid-row: 1 / 3; }",
        )
        .unwrap();

        let legacy = CssProcessor::new(ChainConfig::module(true))
            .unwrap()
            .process(&path, "layout.m.css")
            .unwrap();
        let modern = CssProcessor::new(ChainConfig::module(false))
            .unwrap()
            .process(&path, "layout.m.css")
            .unwrap();

        assert_ne!(legacy.code, modern.code);
        assert!(legacy.code.contains("-ms-grid-columns"), "{}", legacy.code);
        assert!(legacy.code.contains("-ms-grid-row-span"), "{}", legacy.code);
        assert!(legacy.code.contains("-ms-grid"), "{}", legacy.code);
        assert!(!modern.code.contains("-ms-"), "{}", modern.code);
        assert_eq!(legacy.classes, modern.classes);
    }

    #[test]
    fn test_variables_chain_resolves_imports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.css"), ".base { color: blue; }").unwrap();
        let path = dir.path().join("main.css");
        fs::write(&path, "@import \"base.css\";\n.main { color: green; }").unwrap();

        let processor = CssProcessor::new(ChainConfig::variables(false)).unwrap();
        let processed = processor.process(&path, "main.css").unwrap();
        assert!(!processed.code.contains("@import"), "{}", processed.code);
        assert!(processed.code.contains(".base"), "{}", processed.code);
        assert!(processed.code.contains(".main"), "{}", processed.code);
    }

    #[test]
    fn test_scoped_names_are_deterministic() {
        let first = process("card.m.css", ".title { font-weight: bold; }");
        let second = process("card.m.css", ".title { font-weight: bold; }");
        assert_eq!(first.classes, second.classes);
    }
}
