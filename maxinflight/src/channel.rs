//! Token bucket backed by a bounded channel.

use crossbeam::channel::{self, Receiver, Sender};
use tracing::debug;

use crate::TokenBucket;

/// A token bucket that uses a bounded channel as a semaphore.
///
/// Each held token is a `()` sitting in the channel; acquiring is a
/// non-blocking send and releasing a non-blocking receive. The channel's
/// capacity is fixed when it is created, so [`resize`](TokenBucket::resize)
/// is not supported and does nothing.
#[derive(Debug)]
pub struct ChannelTokenBucket {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl ChannelTokenBucket {
    /// Creates a bucket with `max` tokens.
    pub fn new(max: u32) -> Self {
        let (tx, rx) = channel::bounded(max as usize);
        Self { tx, rx }
    }

    /// Returns the number of tokens currently held.
    pub fn in_flight(&self) -> usize {
        self.rx.len()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }
}

impl TokenBucket for ChannelTokenBucket {
    fn try_acquire(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }

    fn release(&self) {
        let _ = self.rx.try_recv();
    }

    fn resize(&self, n: u32) {
        debug!(requested = n, capacity = self.capacity(), "maxinflight: channel bucket cannot be resized");
    }
}
