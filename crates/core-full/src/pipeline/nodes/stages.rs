// Build stage nodes. Each stage records its failures in ERRORS and never
// stops the pipeline; only the stats stage can fail the build.

use crate::css::process_output_css;
use crate::io::{AssetFilter, CssCopyFilter, copy_matching, copy_tree, remove_dir_if_exists};
use crate::process::ToolRunner;
use crate::stats::generate_stats;
use async_trait::async_trait;
use buildlib_core::config::constants::{COMPILER, CSS_TYPINGS_GENERATOR};
use buildlib_core::error::Result;
use buildlib_core::pipeline::{ARGS, ERRORS, LAYOUT, PipeMap, PipeNode, STATS};
use buildlib_core::{BuildArgs, ErrorList, Stage};
use std::sync::Arc;
use tracing::{debug, warn};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Append stage failures to ERRORS
fn record<I>(data: &mut PipeMap, stage: Stage, messages: I)
where
    I: IntoIterator<Item = String>,
{
    let mut errors = data.get_typed(ERRORS).cloned().unwrap_or_default();
    for message in messages {
        warn!("{} stage failed: {}", stage, message);
        errors.push(stage, message);
    }
    data.insert_typed(ERRORS, errors);
}

/// Compiler arguments for `args`
pub fn compiler_args(args: &BuildArgs, out_dir: &std::path::Path) -> Vec<String> {
    let mut tsc = vec!["--outDir".to_string(), out_dir.display().to_string()];
    if !args.legacy {
        tsc.extend(keys(&["-t", "es6", "-m", "esnext"]));
    }
    tsc
}

/// Deletes `output/<mode>`
pub struct CleanOutputNode;

#[async_trait]
impl PipeNode for CleanOutputNode {
    fn name(&self) -> String {
        "CleanOutput".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let mode = data.require("CleanOutput", ARGS)?.mode;
        let output_dir = data.require("CleanOutput", LAYOUT)?.output_dir(mode);

        debug!("Cleaning {:?}", output_dir);
        let failures = remove_dir_if_exists(&output_dir)
            .await
            .err()
            .map(|e| e.to_string());
        record(&mut data, Stage::Clean, failures);
        Ok(data)
    }
}

/// Regenerates `*.m.css.d.ts` typings for every source root
pub struct CssTypingsNode {
    runner: Arc<dyn ToolRunner>,
}

impl CssTypingsNode {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl PipeNode for CssTypingsNode {
    fn name(&self) -> String {
        "CssTypings".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let mode = data.require("CssTypings", ARGS)?.mode;
        let roots = data.require("CssTypings", LAYOUT)?.source_roots(mode);

        for root in roots {
            let tcm_args = vec![root.display().to_string(), "*.m.css".to_string()];
            let outcome = self.runner.run(CSS_TYPINGS_GENERATOR, &tcm_args).await?;
            record(&mut data, Stage::CssTypings, outcome.into_errors());
        }
        Ok(data)
    }
}

/// Runs the compiler. Outside test mode the compiler writes to
/// `output/<mode>/tmp`; its `src` subtree is then moved up into the output.
pub struct CompileNode {
    runner: Arc<dyn ToolRunner>,
}

impl CompileNode {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl PipeNode for CompileNode {
    fn name(&self) -> String {
        "Compile".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let args = data.require("Compile", ARGS)?.clone();
        let layout = data.require("Compile", LAYOUT)?.clone();
        let mode = args.mode;

        let tsc_args = compiler_args(&args, &layout.compiler_out_dir(mode));
        let outcome = self.runner.run(COMPILER, &tsc_args).await?;
        record(&mut data, Stage::Compile, outcome.into_errors());

        if mode.is_test() {
            return Ok(data);
        }

        let output_dir = layout.output_dir(mode);
        if let Err(e) = copy_tree(&layout.staged_src_dir(mode), &output_dir).await {
            record(&mut data, Stage::Compile, [e.to_string()]);
        }
        if let Err(e) = remove_dir_if_exists(&layout.tmp_dir(mode)).await {
            record(&mut data, Stage::Compile, [e.to_string()]);
        }
        Ok(data)
    }
}

/// Copies images and fonts
pub struct CopyAssetsNode;

#[async_trait]
impl PipeNode for CopyAssetsNode {
    fn name(&self) -> String {
        "CopyAssets".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let mode = data.require("CopyAssets", ARGS)?.mode;
        let layout = data.require("CopyAssets", LAYOUT)?.clone();

        debug!("Copying {}", layout.asset_pattern(mode));
        let result = copy_matching(
            AssetFilter,
            &layout.source_roots(mode),
            &layout.copy_base(mode),
            &layout.output_dir(mode),
        )
        .await;
        record(&mut data, Stage::Assets, result.err().map(|e| e.to_string()));
        Ok(data)
    }
}

/// Copies raw `.css` and `.css.d.ts` sources for in-place processing
pub struct CopyCssNode;

#[async_trait]
impl PipeNode for CopyCssNode {
    fn name(&self) -> String {
        "CopyCss".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let mode = data.require("CopyCss", ARGS)?.mode;
        let layout = data.require("CopyCss", LAYOUT)?.clone();

        debug!("Copying {}", layout.css_pattern(mode));
        let result = copy_matching(
            CssCopyFilter,
            &layout.source_roots(mode),
            &layout.copy_base(mode),
            &layout.output_dir(mode),
        )
        .await;
        record(&mut data, Stage::CssCopy, result.err().map(|e| e.to_string()));
        Ok(data)
    }
}

/// Rewrites the copied stylesheets through the CSS chains
pub struct CssProcessNode;

#[async_trait]
impl PipeNode for CssProcessNode {
    fn name(&self) -> String {
        "CssProcess".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[ERRORS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let args = data.require("CssProcess", ARGS)?.clone();
        let layout = data.require("CssProcess", LAYOUT)?.clone();
        let mut errors = data.get_typed(ERRORS).cloned().unwrap_or_default();

        process_output_css(
            &layout.output_dir(args.mode),
            &layout.package_json(),
            args.legacy,
            &mut errors,
        )
        .await;

        data.insert_typed(ERRORS, errors);
        Ok(data)
    }
}

/// Produces the final report from the output tree and ERRORS
pub struct StatsNode;

#[async_trait]
impl PipeNode for StatsNode {
    fn name(&self) -> String {
        "Stats".to_string()
    }

    fn input(&self) -> Vec<String> {
        keys(&[ARGS.name(), LAYOUT.name(), ERRORS.name()])
    }

    fn output(&self) -> Vec<String> {
        keys(&[STATS.name()])
    }

    async fn process(&self, mut data: PipeMap) -> Result<PipeMap> {
        let mode = data.require("Stats", ARGS)?.mode;
        let output_dir = data.require("Stats", LAYOUT)?.output_dir(mode);
        let errors: ErrorList = data.require("Stats", ERRORS)?.clone();

        let report = generate_stats(&output_dir, errors).await?;
        data.insert_typed(STATS, report);
        Ok(data)
    }
}
