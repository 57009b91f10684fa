mod cli;
mod logging;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{BuildOptions, Cli, Commands};
use buildlib_core::ProjectLayout;
use buildlib_core_full::rc::{load_options_file, load_rc_options, resolve_args};
use buildlib_core_full::{BuildLibCommand, HostCommand};

#[tokio::main]
async fn main() {
    let log_file = logging::create_log_file().ok();

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_filter(EnvFilter::new("debug"))
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                ),
        )
        .with(file_layer)
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    let layout = ProjectLayout::new(std::env::current_dir()?);
    let command = BuildLibCommand::for_project(layout.clone(), env!("CARGO_PKG_VERSION"));

    match args.cmd {
        Commands::Build(options) => build(&command, &layout, options).await?,
        Commands::Eject => {
            let output = command.eject()?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Options => {
            println!("{}", serde_json::to_string_pretty(&command.register())?);
        }
    }
    Ok(())
}

async fn build(
    command: &BuildLibCommand,
    layout: &ProjectLayout,
    options: BuildOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file_options = match &options.config {
        Some(path) => load_options_file(path)?,
        None => load_rc_options(layout)?,
    };
    let args = resolve_args(file_options, options.overrides());
    debug!("Resolved arguments: {:?}", args);

    command.run(args).await?;
    Ok(())
}
