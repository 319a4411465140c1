//! Max-in-flight limiter.
//!
//! A [`TokenBucket`] bounds the number of operations in flight at once.
//! Callers take a token with [`TokenBucket::try_acquire`] before starting
//! work and hand it back with [`TokenBucket::release`] afterwards. Acquiring
//! never blocks: when no token is left it simply returns `false`.
//!
//! Four strategies share the same contract:
//!
//! - [`AtomicTokenBucket`] (default): lock-free counter, resizable
//! - [`ChannelTokenBucket`]: bounded channel used as a semaphore, fixed size
//! - [`MutexTokenBucket`]: counter under a mutex, resizable
//! - [`InfinityTokenBucket`]: no limit at all
//!
//! # Example
//!
//! ```
//! use zkit_maxinflight::{new_bucket, Permit, TokenBucket, TokenBucketType};
//!
//! let bucket = new_bucket(TokenBucketType::Mutex, 2);
//! assert!(bucket.try_acquire());
//! assert!(bucket.try_acquire());
//! assert!(!bucket.try_acquire());
//!
//! bucket.release();
//!
//! // A permit gives its token back when dropped.
//! {
//!     let _permit = Permit::try_acquire(bucket.as_ref()).expect("one token left");
//!     assert!(!bucket.try_acquire());
//! }
//! assert!(bucket.try_acquire());
//! ```

mod atomic;
mod channel;
mod error;
mod infinity;
mod kind;
mod mutex;

use std::fmt;
use std::sync::Arc;

pub use atomic::AtomicTokenBucket;
pub use channel::ChannelTokenBucket;
pub use error::Error;
pub use infinity::{InfinityTokenBucket, INFINITY_TOKEN_BUCKET};
pub use kind::{BucketConfig, TokenBucketType};
pub use mutex::MutexTokenBucket;

/// Admission control for in-flight operations.
///
/// Implementations are shared between threads; every method may be called
/// concurrently with the others.
pub trait TokenBucket: Send + Sync {
    /// Takes a token if one is available. Never blocks.
    fn try_acquire(&self) -> bool;

    /// Gives a token back. Releasing with no token held is a no-op.
    fn release(&self);

    /// Changes the capacity. Tokens already held are kept; only later
    /// acquires see the new limit.
    fn resize(&self, n: u32);
}

/// Creates a bucket with the default (atomic) strategy.
pub fn new(size: u32) -> Arc<dyn TokenBucket> {
    new_bucket(TokenBucketType::Atomic, size)
}

/// Creates a bucket with the given strategy.
///
/// `size` is ignored for [`TokenBucketType::Infinity`].
pub fn new_bucket(kind: TokenBucketType, size: u32) -> Arc<dyn TokenBucket> {
    match kind {
        TokenBucketType::Atomic => Arc::new(AtomicTokenBucket::new(size)),
        TokenBucketType::Channel => Arc::new(ChannelTokenBucket::new(size)),
        TokenBucketType::Mutex => Arc::new(MutexTokenBucket::new(size)),
        TokenBucketType::Infinity => new_infinity(),
    }
}

/// Creates a bucket without a limit.
pub fn new_infinity() -> Arc<dyn TokenBucket> {
    Arc::new(InfinityTokenBucket)
}

/// A held token that is released when dropped.
pub struct Permit<'a> {
    bucket: &'a dyn TokenBucket,
}

impl<'a> Permit<'a> {
    /// Takes a token from `bucket`, or returns `None` if none is left.
    pub fn try_acquire(bucket: &'a dyn TokenBucket) -> Option<Self> {
        bucket.try_acquire().then_some(Permit { bucket })
    }
}

impl fmt::Debug for Permit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit").finish_non_exhaustive()
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.bucket.release();
    }
}

#[cfg(test)]
mod tests;
