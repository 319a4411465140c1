use thiserror::Error;

/// Errors returned by maxinflight operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown token bucket type: {0:?} (expected atomic, channel, mutex or infinity)")]
    UnknownBucketType(String),
}
