//! Tests shared by every token bucket strategy.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;

use super::*;

const STRATEGIES: [TokenBucketType; 3] = [
    TokenBucketType::Atomic,
    TokenBucketType::Channel,
    TokenBucketType::Mutex,
];

/// Runs `attempts` concurrent `try_acquire` calls spread over a few threads
/// and returns how many succeeded.
fn concurrent_acquires(bucket: &dyn TokenBucket, attempts: u32) -> u32 {
    const THREADS: u32 = 16;
    let success = AtomicU32::new(0);
    thread::scope(|s| {
        for t in 0..THREADS {
            let share = attempts / THREADS + u32::from(t < attempts % THREADS);
            let success = &success;
            s.spawn(move || {
                for _ in 0..share {
                    if bucket.try_acquire() {
                        success.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });
    success.load(Ordering::Relaxed)
}

#[test]
fn test_concurrent_acquire_bounded() {
    for kind in STRATEGIES {
        let bucket = new_bucket(kind, 10_000);
        let got = concurrent_acquires(bucket.as_ref(), 20_000);
        assert_eq!(got, 10_000, "strategy {}", kind);
    }
}

#[test]
fn test_concurrent_acquire_zero_capacity() {
    for kind in STRATEGIES {
        let bucket = new_bucket(kind, 0);
        let got = concurrent_acquires(bucket.as_ref(), 20_000);
        assert_eq!(got, 0, "strategy {}", kind);
    }
}

#[test]
fn test_atomic_large_capacity() {
    let bucket = new(1_000_000);
    let got = concurrent_acquires(bucket.as_ref(), 2_000_000);
    assert_eq!(got, 1_000_000);
}

#[test]
fn test_infinity_always_grants() {
    let bucket = new_bucket(TokenBucketType::Infinity, 1_000);
    let got = concurrent_acquires(bucket.as_ref(), 200_000);
    assert_eq!(got, 200_000);

    bucket.resize(0);
    bucket.release();
    assert!(bucket.try_acquire());
    assert!(INFINITY_TOKEN_BUCKET.try_acquire());
    assert!(new_infinity().try_acquire());
}

#[test]
fn test_release_then_reacquire_once() {
    for kind in STRATEGIES {
        let bucket = new_bucket(kind, 5);
        for _ in 0..5 {
            assert!(bucket.try_acquire(), "strategy {}", kind);
        }
        assert!(!bucket.try_acquire(), "strategy {}", kind);

        bucket.release();
        assert!(bucket.try_acquire(), "strategy {}", kind);
        assert!(!bucket.try_acquire(), "strategy {}", kind);
    }
}

#[test]
fn test_release_without_acquire() {
    for kind in STRATEGIES {
        let bucket = new_bucket(kind, 2);
        for _ in 0..10 {
            bucket.release();
        }
        assert!(bucket.try_acquire(), "strategy {}", kind);
        assert!(bucket.try_acquire(), "strategy {}", kind);
        assert!(!bucket.try_acquire(), "strategy {}", kind);
    }
}

#[test]
fn test_acquire_release_cycles_stay_bounded() {
    const MAX: u32 = 8;
    for kind in STRATEGIES {
        let bucket = new_bucket(kind, MAX);
        let held = AtomicU32::new(0);
        let peak = AtomicU32::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..2_000 {
                        if bucket.try_acquire() {
                            let now = held.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            held.fetch_sub(1, Ordering::SeqCst);
                            bucket.release();
                        }
                    }
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= MAX, "strategy {}", kind);
        assert!(bucket.try_acquire(), "strategy {}", kind);
    }
}

#[test]
fn test_resize_strategies() {
    for kind in [TokenBucketType::Atomic, TokenBucketType::Mutex] {
        let bucket = new_bucket(kind, 1);
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());

        bucket.resize(2);
        assert!(bucket.try_acquire(), "strategy {}", kind);
        assert!(!bucket.try_acquire(), "strategy {}", kind);
    }

    let bucket = new_bucket(TokenBucketType::Channel, 1);
    assert!(bucket.try_acquire());
    bucket.resize(2);
    assert!(!bucket.try_acquire());
}

const RESIZE_MAX: u32 = 8;

/// Runs acquire/release churn on several threads while another thread keeps
/// resizing `bucket` between 1 and RESIZE_MAX. `held` is called after every
/// successful acquire with the bucket's in-flight count.
fn churn_while_resizing(bucket: &dyn TokenBucket, held: impl Fn() + Sync) {
    let stop = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            let mut n = 1;
            while !stop.load(Ordering::Relaxed) {
                bucket.resize(n);
                n = n % RESIZE_MAX + 1;
            }
        });

        let workers: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    for _ in 0..5_000 {
                        if bucket.try_acquire() {
                            held();
                            bucket.release();
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
    });
}

#[test]
fn test_mutex_resize_during_churn() {
    let bucket = MutexTokenBucket::new(RESIZE_MAX);
    let violations = AtomicU32::new(0);
    churn_while_resizing(&bucket, || {
        if bucket.in_flight() > RESIZE_MAX {
            violations.fetch_add(1, Ordering::Relaxed);
        }
    });

    assert_eq!(violations.load(Ordering::Relaxed), 0);
    assert_eq!(bucket.in_flight(), 0);
}

#[test]
fn test_atomic_resize_during_churn() {
    let bucket = AtomicTokenBucket::new(RESIZE_MAX);
    churn_while_resizing(&bucket, || {});

    assert_eq!(bucket.in_flight(), 0);

    // No token leaked: the full capacity is available again.
    bucket.resize(RESIZE_MAX);
    for _ in 0..RESIZE_MAX {
        assert!(bucket.try_acquire());
    }
    assert!(!bucket.try_acquire());
}

#[test]
fn test_permit_releases_on_drop() {
    let bucket = MutexTokenBucket::new(1);
    {
        let permit = Permit::try_acquire(&bucket);
        assert!(permit.is_some());
        assert!(Permit::try_acquire(&bucket).is_none());
        assert_eq!(bucket.in_flight(), 1);
    }
    assert_eq!(bucket.in_flight(), 0);
    assert!(Permit::try_acquire(&bucket).is_some());
}

#[test]
fn test_buckets_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AtomicTokenBucket>();
    assert_send_sync::<ChannelTokenBucket>();
    assert_send_sync::<MutexTokenBucket>();
    assert_send_sync::<InfinityTokenBucket>();
    assert_send_sync::<Arc<dyn TokenBucket>>();
}
