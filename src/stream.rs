//! Shared atomic helpers for parallel search: a bounded draw budget and an early-stop flag.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Hands out draw indices `0..cap` across workers; `None` once the cap is spent.
#[derive(Debug)]
pub struct IterationBudget {
    next: AtomicU64,
    cap: u64,
}

impl IterationBudget {
    pub const fn new(cap: u64) -> Self {
        Self {
            next: AtomicU64::new(0),
            cap,
        }
    }

    /// Reserve one draw, returning its 1-based position in the global sequence.
    #[inline]
    pub fn reserve(&self) -> Option<u64> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        if n < self.cap {
            Some(n + 1)
        } else {
            None
        }
    }

    /// Draws handed out so far, never more than the cap.
    pub fn spent(&self) -> u64 {
        self.next.load(Ordering::Relaxed).min(self.cap)
    }
}

#[derive(Debug)]
pub struct StopFlag {
    stop: AtomicBool,
}

impl StopFlag {
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn force_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}
