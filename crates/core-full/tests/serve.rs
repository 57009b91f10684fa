// Integration tests for serve mode
mod support;

use buildlib_core::error::BuildLibError;
use buildlib_core::{BuildArgs, Mode, ProjectLayout};
use buildlib_core_full::serve::serve;
use buildlib_core_full::{BuildPipeline, StaticServer};
use std::sync::Arc;
use support::FakeRunner;

#[tokio::test]
async fn test_serves_build_output() {
    let dir = support::project();
    let runner = Arc::new(FakeRunner::new().emitting_js());
    let pipeline = BuildPipeline::new(ProjectLayout::new(dir.path()), runner);

    let args = BuildArgs::new(Mode::Dist).with_serve(true, 0);
    let (report, server) = serve(&pipeline, &args).await.unwrap();
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let port = server.addr().port();
    assert_ne!(port, 0);
    tokio::spawn(server.run());

    let body = reqwest::get(format!("http://127.0.0.1:{port}/index.js"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "export * from './widget/widget';");

    let missing = reqwest::get(format!("http://127.0.0.1:{port}/nope.js"))
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_port_in_use_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let taken = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let err = match StaticServer::bind(dir.path(), port) {
        Ok(_) => panic!("bind on a taken port succeeded"),
        Err(err) => err,
    };
    assert!(matches!(err, BuildLibError::Serve { port: p, .. } if p == port));
}
