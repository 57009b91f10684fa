use crate::pipeline::nodes::{
    CleanOutputNode, CompileNode, CopyAssetsNode, CopyCssNode, CssProcessNode, CssTypingsNode,
    StatsNode,
};
use crate::pipeline::{PipeMap, Pipeline};
use crate::process::ToolRunner;
use buildlib_core::error::{BuildLibError, PipelineResult, Result};
use buildlib_core::pipeline::{ARGS, ERRORS, LAYOUT, STATS};
use buildlib_core::{BuildArgs, ErrorList, ProjectLayout, StatsReport};
use std::sync::Arc;
use tracing::{debug, info};

/// One full build: clean, typings, compile, copy assets and CSS, process CSS,
/// stats. Stage failures end up in the report; only unexpected faults are
/// returned as errors.
#[derive(Clone)]
pub struct BuildPipeline {
    layout: ProjectLayout,
    runner: Arc<dyn ToolRunner>,
}

impl BuildPipeline {
    pub fn new(layout: ProjectLayout, runner: Arc<dyn ToolRunner>) -> Self {
        Self { layout, runner }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Stage wiring, in execution order
    pub fn pipeline(&self) -> PipelineResult<Pipeline> {
        Pipeline::new("BuildLibPipeline")
            .with_external_inputs([ARGS.name(), LAYOUT.name(), ERRORS.name()])
            .add_node(Box::new(CleanOutputNode))?
            .add_node(Box::new(CssTypingsNode::new(Arc::clone(&self.runner))))?
            .add_node(Box::new(CompileNode::new(Arc::clone(&self.runner))))?
            .add_node(Box::new(CopyAssetsNode))?
            .add_node(Box::new(CopyCssNode))?
            .add_node(Box::new(CssProcessNode))?
            .add_node(Box::new(StatsNode))
    }

    pub async fn build(&self, args: &BuildArgs) -> Result<StatsReport> {
        debug!("Starting {} build in {:?}", args.mode, self.layout.base());

        let pipeline = self.pipeline()?;
        let data = PipeMap::new()
            .with(ARGS, args.clone())
            .with(LAYOUT, self.layout.clone())
            .with(ERRORS, ErrorList::new());

        let result = pipeline.execute(data).await?;
        let report = result
            .get_typed(STATS)
            .cloned()
            .ok_or_else(|| BuildLibError::other("build finished without a report"))?;

        info!(
            "Build finished with {} errors and {} assets",
            report.errors.len(),
            report.assets.len()
        );
        Ok(report)
    }
}
