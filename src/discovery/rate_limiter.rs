use core::time::Duration;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Token bucket guarding per-item statistics requests.
///
/// Wrap in an `Arc` via [`RateLimiter::new`] and share it between every adapter that issues
/// secondary requests. Call [`RateLimiter::acquire`] before each request.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    refill_tokens: u32,
    refill_interval: Duration,
    bucket: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a full bucket holding `capacity` tokens that gains `refill_tokens` every `refill_interval`.
    ///
    /// Zero capacity or refill counts are raised to 1 so that [`Self::acquire`] always makes progress.
    #[must_use]
    pub fn new(capacity: u32, refill_tokens: u32, refill_interval: Duration) -> Arc<Self> {
        let capacity = capacity.max(1);
        Arc::new(Self {
            capacity,
            refill_tokens: refill_tokens.max(1),
            refill_interval,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Take one token, waiting one refill interval at a time until one is available.
    pub async fn acquire(&self) {
        loop {
            if self.try_acquire() {
                return;
            }

            tokio::time::sleep(self.refill_interval).await;
        }
    }

    /// Take one token if one is available right now
    pub fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock().expect("lock not poisoned");
        self.refill(&mut bucket);

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens currently in the bucket
    #[must_use]
    pub fn available(&self) -> u32 {
        let mut bucket = self.bucket.lock().expect("lock not poisoned");
        self.refill(&mut bucket);
        bucket.tokens
    }

    fn refill(&self, bucket: &mut Bucket) {
        if self.refill_interval.is_zero() {
            bucket.tokens = self.capacity;
            bucket.last_refill = Instant::now();
            return;
        }

        let elapsed = bucket.last_refill.elapsed();
        let intervals = elapsed.as_nanos() / self.refill_interval.as_nanos();
        if intervals == 0 {
            return;
        }

        let added = intervals.saturating_mul(u128::from(self.refill_tokens));
        let tokens = u128::from(bucket.tokens).saturating_add(added).min(u128::from(self.capacity));
        bucket.tokens = u32::try_from(tokens).unwrap_or(self.capacity);

        let whole = u32::try_from(intervals).unwrap_or(u32::MAX);
        bucket.last_refill += self.refill_interval.saturating_mul(whole);
    }
}
