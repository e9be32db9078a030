//! Tracking of temporary decode/encode handles.
//!
//! Every decode or encode holds a [`ResourceHandle`] for its duration. The
//! handle is released in `Drop`, so it goes away on success, on error and
//! during a panic unwind. A decode handle travels with the decode work: an
//! async decode releases it when a timeout drops the pending future, while a
//! blocking worker that outlives its timeout keeps it until the worker ends.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// What a handle was acquired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Decode,
    Encode,
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleKind::Decode => write!(f, "decode"),
            HandleKind::Encode => write!(f, "encode"),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    acquired: AtomicU64,
}

/// Shared counter of outstanding handles. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    counters: Arc<Counters>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a handle over `bytes` bytes of source or target data.
    pub fn acquire(&self, kind: HandleKind, item: &str, bytes: usize) -> ResourceHandle {
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        self.counters.acquired.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("acquire {kind} handle for {item} ({bytes} bytes)");
        ResourceHandle {
            counters: Arc::clone(&self.counters),
            kind,
            item: item.to_string(),
        }
    }

    /// Handles currently held.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Handles acquired since the tracker was created.
    pub fn total_acquired(&self) -> u64 {
        self.counters.acquired.load(Ordering::Relaxed)
    }
}

/// RAII guard for one decode or encode operation.
#[derive(Debug)]
pub struct ResourceHandle {
    counters: Arc<Counters>,
    kind: HandleKind,
    item: String,
}

impl ResourceHandle {
    pub fn kind(&self) -> HandleKind {
        self.kind
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!("release {} handle for {}", self.kind, self.item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_released_on_drop() {
        let tracker = ResourceTracker::new();
        {
            let a = tracker.acquire(HandleKind::Decode, "a.jpg", 10);
            let _b = tracker.acquire(HandleKind::Encode, "a.jpg", 10);
            assert_eq!(a.kind(), HandleKind::Decode);
            assert_eq!(tracker.live(), 2);
        }
        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.total_acquired(), 2);
    }

    #[test]
    fn test_handle_released_on_error_path() {
        fn failing(tracker: &ResourceTracker) -> Result<(), String> {
            let _handle = tracker.acquire(HandleKind::Decode, "bad.png", 4);
            Err("corrupt".to_string())
        }

        let tracker = ResourceTracker::new();
        assert!(failing(&tracker).is_err());
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_handle_released_on_panic() {
        let tracker = ResourceTracker::new();
        let cloned = tracker.clone();
        let result = std::panic::catch_unwind(move || {
            let _handle = cloned.acquire(HandleKind::Encode, "boom.gif", 1);
            panic!("encoder crashed");
        });
        assert!(result.is_err());
        assert_eq!(tracker.live(), 0);
    }
}
