use crate::TokenBucket;

/// A token bucket without a limit: every acquire succeeds.
///
/// Use it where a [`TokenBucket`] is required but no admission limit is
/// wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct InfinityTokenBucket;

impl TokenBucket for InfinityTokenBucket {
    fn try_acquire(&self) -> bool {
        true
    }

    fn release(&self) {}

    fn resize(&self, _n: u32) {}
}

/// Shared unlimited bucket.
pub static INFINITY_TOKEN_BUCKET: InfinityTokenBucket = InfinityTokenBucket;
