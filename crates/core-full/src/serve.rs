//! Static file server over the build output

use crate::commands::BuildPipeline;
use buildlib_core::error::{BuildLibError, Result};
use buildlib_core::{BuildArgs, StatsReport};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;
use tracing::info;

pub struct StaticServer {
    addr: SocketAddr,
    server: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl StaticServer {
    /// Bind to `port` on all interfaces, serving files below `root`.
    /// Must be called inside a tokio runtime.
    pub fn bind(root: impl Into<PathBuf>, port: u16) -> Result<Self> {
        let routes = warp::fs::dir(root.into());
        let (addr, server) = warp::serve(routes)
            .try_bind_ephemeral(([0, 0, 0, 0], port))
            .map_err(|e| BuildLibError::Serve {
                port,
                message: e.to_string(),
            })?;
        info!("Serving on {}", addr);
        Ok(Self {
            addr,
            server: Box::pin(server),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until the process ends
    pub async fn run(self) {
        self.server.await
    }
}

/// Build once, then bind the server on `args.port` over the output directory
pub async fn serve(pipeline: &BuildPipeline, args: &BuildArgs) -> Result<(StatsReport, StaticServer)> {
    let report = pipeline.build(args).await?;
    let server = StaticServer::bind(pipeline.layout().output_dir(args.mode), args.port)?;
    Ok((report, server))
}
