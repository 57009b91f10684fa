//! Rebuild on source changes, one build at a time.

use crate::commands::BuildPipeline;
use crate::io::{FileFilter, WatchFilter};
use buildlib_core::error::{BuildLibError, Result};
use buildlib_core::watch::WatchSession;
use buildlib_core::{BuildArgs, StatsReport};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Receives the outcome of every build started by the coordinator
pub type BuildCallback = Arc<dyn Fn(Result<StatsReport>) + Send + Sync>;

pub struct WatchCoordinator {
    pipeline: BuildPipeline,
    args: BuildArgs,
    session: Arc<WatchSession>,
    callback: BuildCallback,
}

impl WatchCoordinator {
    pub fn new(pipeline: BuildPipeline, args: BuildArgs, callback: BuildCallback) -> Self {
        Self {
            pipeline,
            args,
            session: Arc::new(WatchSession::new()),
            callback,
        }
    }

    pub fn session(&self) -> &WatchSession {
        &self.session
    }

    /// Start a build unless one is already running. Returns the build task,
    /// or `None` when the change was dropped.
    pub fn on_change(&self) -> Option<JoinHandle<()>> {
        let Some(guard) = self.session.begin() else {
            debug!("Build in progress, dropping change");
            return None;
        };

        let pipeline = self.pipeline.clone();
        let args = self.args.clone();
        let callback = Arc::clone(&self.callback);

        Some(tokio::spawn(async move {
            let result = pipeline.build(&args).await;
            drop(guard);
            callback(result);
        }))
    }

    /// Build once, then rebuild on relevant file events until the process ends.
    /// Watcher errors are logged and watching continues.
    pub async fn watch(&self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Err(e) = tx.send(res) {
                    error!("Failed to send watch event: {}", e);
                }
            },
            Config::default(),
        )
        .map_err(|e| BuildLibError::watch(e.to_string()))?;

        let layout = self.pipeline.layout();
        for root in layout.source_roots(self.args.mode) {
            if !root.is_dir() {
                debug!("Skipping missing source root {:?}", root);
                continue;
            }
            match watcher.watch(&root, RecursiveMode::Recursive) {
                Ok(()) => debug!("Watching directory: {:?}", root),
                Err(e) => error!("Failed to watch {:?}: {}", root, e),
            }
        }
        info!("Watching {}", layout.watch_pattern(self.args.mode));

        self.on_change();

        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) if is_relevant(&event) => {
                    debug!("Change detected: {:?}", event.paths);
                    self.on_change();
                }
                Ok(_) => {}
                Err(e) => error!("Watch error: {}", e),
            }
        }

        Ok(())
    }
}

/// Additions, changes and removals of watched file types
pub fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|path| WatchFilter.should_include(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind};
    use std::path::PathBuf;

    #[test]
    fn test_relevant_events() {
        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/p/src/widget.m.css"));
        assert!(is_relevant(&create));

        let other_file = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/p/src/notes.md"));
        assert!(!is_relevant(&other_file));

        let access = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/p/src/index.ts"));
        assert!(!is_relevant(&access));
    }
}
