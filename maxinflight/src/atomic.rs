//! Lock-free token bucket.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use tracing::debug;

use crate::TokenBucket;

/// A token bucket built on atomics.
///
/// The count is an `i64` while the capacity is a `u32`, so the speculative
/// increment in [`try_acquire`](TokenBucket::try_acquire) can never
/// overflow. A count that went negative (more releases than acquires racing
/// with a resize) is reset on the next acquire.
///
/// Never blocks. While a [`resize`](TokenBucket::resize) races with
/// acquires, admission may briefly follow either the old or new capacity.
#[derive(Debug, Default)]
pub struct AtomicTokenBucket {
    max: AtomicU32,
    count: AtomicI64,
}

impl AtomicTokenBucket {
    /// Creates a bucket with `max` tokens.
    pub fn new(max: u32) -> Self {
        Self {
            max: AtomicU32::new(max),
            count: AtomicI64::new(0),
        }
    }

    /// Returns the number of tokens currently held.
    pub fn in_flight(&self) -> i64 {
        self.count.load(Ordering::Acquire)
    }

    /// Returns the current capacity.
    pub fn capacity(&self) -> u32 {
        self.max.load(Ordering::Acquire)
    }
}

impl TokenBucket for AtomicTokenBucket {
    fn try_acquire(&self) -> bool {
        let count = self.count.load(Ordering::Acquire);
        let max = i64::from(self.max.load(Ordering::Acquire));

        if count < 0 {
            // Reset to 0 and take one in a single step.
            if self
                .count
                .compare_exchange(count, 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
            // Someone else already moved it to >= 0; fall through.
        } else if count >= max {
            return false;
        }

        let count = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        if count > max {
            self.count.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }

    fn release(&self) {
        if self.count.load(Ordering::Acquire) <= 0 {
            return;
        }
        if self.count.fetch_sub(1, Ordering::AcqRel) - 1 < 0 {
            self.count.store(0, Ordering::Release);
        }
    }

    fn resize(&self, n: u32) {
        let old = self.max.swap(n, Ordering::AcqRel);
        if old != n {
            debug!(from = old, to = n, "maxinflight: atomic bucket resized");
        }
    }
}
