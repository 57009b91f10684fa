//! Rebuild gating for watch mode.
//!
//! At most one build runs at a time. A change notification that arrives while
//! a build is running is dropped; it is not queued for a follow-up build.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Building,
}

impl WatchState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => WatchState::Building,
            _ => WatchState::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            WatchState::Idle => 0,
            WatchState::Building => 1,
        }
    }
}

/// Shared between the watcher loop and running builds
#[derive(Debug)]
pub struct WatchSession {
    state: AtomicU8,
}

impl WatchSession {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(WatchState::Idle.as_u8()),
        }
    }

    pub fn state(&self) -> WatchState {
        WatchState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_building(&self) -> bool {
        self.state() == WatchState::Building
    }

    /// Idle -> Building. Returns false when a build is already running.
    pub fn try_begin(&self) -> bool {
        self.state
            .compare_exchange(
                WatchState::Idle.as_u8(),
                WatchState::Building.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Like `try_begin`, but the session returns to Idle when the guard drops,
    /// including when the build panics.
    pub fn begin(self: &Arc<Self>) -> Option<BuildGuard> {
        self.try_begin().then(|| BuildGuard {
            session: Arc::clone(self),
        })
    }

    /// Building -> Idle
    pub fn finish(&self) {
        self.state
            .store(WatchState::Idle.as_u8(), Ordering::Release);
    }
}

/// Holds a session in Building until dropped
#[derive(Debug)]
pub struct BuildGuard {
    session: Arc<WatchSession>,
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        self.session.finish();
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_exclusive() {
        let session = WatchSession::new();
        assert_eq!(session.state(), WatchState::Idle);
        assert!(session.try_begin());
        assert!(session.is_building());
        assert!(!session.try_begin());
        assert!(!session.try_begin());
        session.finish();
        assert_eq!(session.state(), WatchState::Idle);
        assert!(session.try_begin());
    }

    #[test]
    fn test_guard_finishes_on_drop() {
        let session = Arc::new(WatchSession::new());
        let guard = session.begin().unwrap();
        assert!(session.is_building());
        assert!(session.begin().is_none());
        drop(guard);
        assert_eq!(session.state(), WatchState::Idle);
    }

    #[test]
    fn test_guard_finishes_when_build_panics() {
        let session = Arc::new(WatchSession::new());
        let guard = session.begin().unwrap();
        let build = std::thread::spawn(move || {
            let _guard = guard;
            panic!("build failed");
        });
        assert!(build.join().is_err());
        assert_eq!(session.state(), WatchState::Idle);
    }

    #[test]
    fn test_concurrent_begin_admits_one() {
        let session = Arc::new(WatchSession::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || session.try_begin())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|began| *began)
            .count();
        assert_eq!(admitted, 1);
    }
}
