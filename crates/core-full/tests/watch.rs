// Integration tests for watch mode
mod support;

use buildlib_core::{BuildArgs, Mode, ProjectLayout};
use buildlib_core_full::{BuildCallback, BuildPipeline, WatchCoordinator};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use support::FakeRunner;
use tokio::sync::Notify;

struct Counter {
    builds: AtomicUsize,
    notify: Notify,
}

fn coordinator(
    dir: &std::path::Path,
    runner: FakeRunner,
) -> (WatchCoordinator, Arc<Counter>, Arc<FakeRunner>) {
    let runner = Arc::new(runner);
    let counter = Arc::new(Counter {
        builds: AtomicUsize::new(0),
        notify: Notify::new(),
    });
    let seen = counter.clone();
    let callback: BuildCallback = Arc::new(move |result| {
        assert!(result.is_ok());
        seen.builds.fetch_add(1, Ordering::SeqCst);
        seen.notify.notify_one();
    });
    let pipeline = BuildPipeline::new(ProjectLayout::new(dir), runner.clone());
    let coordinator = WatchCoordinator::new(pipeline, BuildArgs::new(Mode::Dev), callback);
    (coordinator, counter, runner)
}

async fn wait_for_builds(counter: &Counter, expected: usize) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while counter.builds.load(Ordering::SeqCst) < expected {
            counter.notify.notified().await;
        }
    })
    .await
    .expect("timed out waiting for build");
}

#[tokio::test]
async fn test_rapid_changes_during_build_start_one_build() {
    let dir = support::project();
    let (coordinator, counter, runner) =
        coordinator(dir.path(), FakeRunner::new().with_delay(Duration::from_millis(200)));

    let initial = coordinator.on_change().expect("idle coordinator starts a build");
    initial.await.unwrap();
    assert_eq!(counter.builds.load(Ordering::SeqCst), 1);
    assert!(!coordinator.session().is_building());

    let started: Vec<_> = (0..6).filter_map(|_| coordinator.on_change()).collect();
    assert_eq!(started.len(), 1);
    assert!(coordinator.session().is_building());

    for handle in started {
        handle.await.unwrap();
    }
    assert_eq!(counter.builds.load(Ordering::SeqCst), 2);
    assert_eq!(runner.calls_to("tsc").len(), 2);
    assert!(!coordinator.session().is_building());
}

#[tokio::test]
async fn test_change_during_build_is_dropped() {
    let dir = support::project();
    let (coordinator, counter, _) =
        coordinator(dir.path(), FakeRunner::new().with_delay(Duration::from_millis(100)));

    let first = coordinator.on_change().unwrap();
    assert!(coordinator.on_change().is_none());
    first.await.unwrap();

    // nothing is queued behind the finished build
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(counter.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_panicking_build_leaves_session_idle() {
    let dir = support::project();
    let panicked = Arc::new(AtomicBool::new(false));
    let once = panicked.clone();
    let runner = FakeRunner::new().on_run(move |tool, _| {
        if tool == "tsc" && !once.swap(true, Ordering::SeqCst) {
            panic!("compiler crashed");
        }
    });
    let (coordinator, counter, _) = coordinator(dir.path(), runner);

    let crashed = coordinator.on_change().unwrap();
    assert!(crashed.await.unwrap_err().is_panic());
    assert!(panicked.load(Ordering::SeqCst));
    assert!(!coordinator.session().is_building());
    assert_eq!(counter.builds.load(Ordering::SeqCst), 0);

    // the next change is not dropped
    let next = coordinator.on_change().expect("session returned to idle");
    next.await.unwrap();
    assert_eq!(counter.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_watch_builds_on_start_and_on_change() {
    let dir = support::project();
    let (coordinator, counter, runner) = coordinator(dir.path(), FakeRunner::new());
    let coordinator = Arc::new(coordinator);

    let watching = coordinator.clone();
    let task = tokio::spawn(async move { watching.watch().await });

    wait_for_builds(&counter, 1).await;
    assert_eq!(runner.calls_to("tsc").len(), 1);

    // let the first build settle before touching sources
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(dir.path().join("src/added.ts"), "export const added = 1;").unwrap();
    wait_for_builds(&counter, 2).await;

    task.abort();
}
