//! Mutex-guarded token bucket.

use parking_lot::Mutex;
use tracing::debug;

use crate::TokenBucket;

/// A token bucket whose counter is guarded by a mutex.
///
/// Acquire, release and resize are serialized by the lock, so the count
/// stays within `0..=max` even while resizing.
#[derive(Debug, Default)]
pub struct MutexTokenBucket {
    state: Mutex<MutexState>,
}

#[derive(Debug, Default)]
struct MutexState {
    count: u32,
    max: u32,
}

impl MutexTokenBucket {
    /// Creates a bucket with `max` tokens.
    pub fn new(max: u32) -> Self {
        Self {
            state: Mutex::new(MutexState { count: 0, max }),
        }
    }

    /// Returns the number of tokens currently held.
    pub fn in_flight(&self) -> u32 {
        self.state.lock().count
    }

    /// Returns the current capacity.
    pub fn capacity(&self) -> u32 {
        self.state.lock().max
    }
}

impl TokenBucket for MutexTokenBucket {
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if state.count >= state.max {
            return false;
        }
        state.count += 1;
        true
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.count = state.count.saturating_sub(1);
    }

    fn resize(&self, n: u32) {
        let mut state = self.state.lock();
        if state.max != n {
            debug!(from = state.max, to = n, "maxinflight: mutex bucket resized");
            state.max = n;
        }
    }
}
