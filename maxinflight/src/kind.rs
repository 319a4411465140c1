//! Strategy selection and configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::{new_bucket, TokenBucket};

/// Concurrency strategy of a token bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBucketType {
    /// Lock-free counter ([`AtomicTokenBucket`](crate::AtomicTokenBucket)).
    #[default]
    Atomic,
    /// Bounded channel as a semaphore ([`ChannelTokenBucket`](crate::ChannelTokenBucket)).
    Channel,
    /// Counter under a mutex ([`MutexTokenBucket`](crate::MutexTokenBucket)).
    Mutex,
    /// No limit ([`InfinityTokenBucket`](crate::InfinityTokenBucket)).
    Infinity,
}

impl TokenBucketType {
    /// Returns the lowercase name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenBucketType::Atomic => "atomic",
            TokenBucketType::Channel => "channel",
            TokenBucketType::Mutex => "mutex",
            TokenBucketType::Infinity => "infinity",
        }
    }
}

impl fmt::Display for TokenBucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenBucketType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(TokenBucketType::Atomic),
            "channel" => Ok(TokenBucketType::Channel),
            "mutex" => Ok(TokenBucketType::Mutex),
            "infinity" => Ok(TokenBucketType::Infinity),
            _ => Err(Error::UnknownBucketType(s.to_string())),
        }
    }
}

/// Token bucket configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Concurrency strategy.
    pub kind: TokenBucketType,
    /// Maximum number of tokens in flight.
    pub size: u32,
}

impl BucketConfig {
    /// Create a config for the default strategy.
    pub fn new(size: u32) -> Self {
        Self {
            kind: TokenBucketType::default(),
            size,
        }
    }

    /// Set the strategy.
    pub fn with_kind(mut self, kind: TokenBucketType) -> Self {
        self.kind = kind;
        self
    }

    /// Build the configured bucket.
    pub fn build(&self) -> Arc<dyn TokenBucket> {
        new_bucket(self.kind, self.size)
    }
}
