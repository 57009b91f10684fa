//! The command as a host framework sees it: options, run, eject.

use crate::commands::BuildPipeline;
use crate::eject::{build_npm_dependencies, create_and_link_ejected_build_file, move_build_options};
use crate::process::{ProcessRunner, ToolRunner};
use crate::reporter::{StatusReporter, Versions};
use crate::serve::serve;
use crate::watch::{BuildCallback, WatchCoordinator};
use async_trait::async_trait;
use buildlib_core::config::constants::{
    COMMAND_GROUP, COMMAND_NAME, EJECTED_OPTIONS_FILE, EJECTED_SCRIPT, TOOL_NAME,
};
use buildlib_core::error::Result;
use buildlib_core::plugin::{EjectCopy, EjectNpm, EjectOutput, OptionSpec, build_options};
use buildlib_core::{BuildArgs, Invocation, ProjectLayout};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[async_trait]
pub trait HostCommand: Send + Sync {
    fn group(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// `<group>-<name>`, also the command's rc key
    fn full_name(&self) -> String {
        format!("{}-{}", self.group(), self.name())
    }

    fn register(&self) -> Vec<OptionSpec>;

    async fn run(&self, args: BuildArgs) -> Result<()>;

    fn eject(&self) -> Result<EjectOutput>;
}

pub struct BuildLibCommand {
    pipeline: BuildPipeline,
    reporter: Arc<StatusReporter>,
    version: String,
}

impl BuildLibCommand {
    pub fn new(layout: ProjectLayout, runner: Arc<dyn ToolRunner>, version: &str) -> Self {
        let reporter = StatusReporter::new(Versions::detect(&layout, version));
        Self {
            pipeline: BuildPipeline::new(layout, runner),
            reporter: Arc::new(reporter),
            version: version.to_string(),
        }
    }

    /// Command running the tools installed in the project
    pub fn for_project(layout: ProjectLayout, version: &str) -> Self {
        let runner = Arc::new(ProcessRunner::new(layout.clone()));
        Self::new(layout, runner, version)
    }

    pub fn pipeline(&self) -> &BuildPipeline {
        &self.pipeline
    }

    fn report_callback(&self, running_message: String) -> BuildCallback {
        let reporter = Arc::clone(&self.reporter);
        Arc::new(move |result| match result {
            Ok(report) => {
                if let Err(e) = reporter.report(&report, &running_message) {
                    error!("Failed to write status: {}", e);
                }
            }
            Err(e) => error!("Build failed: {}", e),
        })
    }
}

#[async_trait]
impl HostCommand for BuildLibCommand {
    fn group(&self) -> &'static str {
        COMMAND_GROUP
    }

    fn name(&self) -> &'static str {
        COMMAND_NAME
    }

    fn description(&self) -> &'static str {
        "create a build of your library"
    }

    fn register(&self) -> Vec<OptionSpec> {
        build_options()
    }

    async fn run(&self, args: BuildArgs) -> Result<()> {
        let running_message = args.running_message();

        match args.invocation() {
            Invocation::Build => {
                let report = self.pipeline.build(&args).await?;
                self.reporter.report(&report, &running_message)?;
            }
            Invocation::Serve => {
                let (report, server) = serve(&self.pipeline, &args).await?;
                self.reporter.report(&report, &running_message)?;
                server.run().await;
            }
            Invocation::Watch => {
                let callback = self.report_callback(running_message);
                WatchCoordinator::new(self.pipeline.clone(), args, callback)
                    .watch()
                    .await?;
            }
        }
        Ok(())
    }

    fn eject(&self) -> Result<EjectOutput> {
        let key = self.full_name();
        let layout = self.pipeline.layout();
        let dev_dependencies = build_npm_dependencies(layout, TOOL_NAME, &self.version)?;

        let staging = tempfile::Builder::new()
            .prefix("build-lib-eject")
            .tempdir()?
            .keep();
        create_and_link_ejected_build_file(layout, &layout.eject_dir(&key), &staging)?;
        move_build_options(layout, &key, &staging)?;
        info!("Ejected files staged in {:?}", staging);

        Ok(EjectOutput {
            copy: EjectCopy {
                path: staging,
                files: vec![
                    PathBuf::from(EJECTED_SCRIPT),
                    PathBuf::from(EJECTED_OPTIONS_FILE),
                ],
            },
            hints: vec![format!(
                "to build run {}",
                style("./build-lib --mode={dev|dist|test} --legacy --watch --serve").underlined()
            )],
            npm: EjectNpm { dev_dependencies },
        })
    }
}
