//! In-process keyed rate limiter using the `governor` GCRA implementation.

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use tracing::debug;

use super::service::{RateLimitedAction, RateLimiter};

type Key = (String, RateLimitedAction);

/// Per-(identity, action) limiter.
///
/// Each key gets a burst of `per_minute` cells that replenish evenly over a
/// minute, so `per_minute + 1` back-to-back calls always reject the last one.
pub struct KeyedRateLimiter {
    limiter: DefaultKeyedRateLimiter<Key>,
    per_minute: NonZeroU32,
}

impl KeyedRateLimiter {
    /// Creates a limiter allowing `per_minute` calls per key (minimum 1).
    pub fn per_minute(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Governor::keyed(Quota::per_minute(per_minute)),
            per_minute,
        }
    }

    /// Drops state for keys whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

impl RateLimiter for KeyedRateLimiter {
    fn allow(&self, identity: &str, action: RateLimitedAction) -> bool {
        let key = (identity.to_string(), action);
        let allowed = self.limiter.check_key(&key).is_ok();

        if !allowed {
            debug!(identity, %action, "Rate limit exceeded");
        }

        allowed
    }

    fn quota_per_minute(&self, _action: RateLimitedAction) -> u32 {
        self.per_minute.get()
    }
}
