//! Rate limiter trait.

use std::fmt;

/// Operations subject to per-user throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitedAction {
    CreateShortUrl,
}

impl fmt::Display for RateLimitedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateShortUrl => f.write_str("create_short_url"),
        }
    }
}

/// Decides whether `identity` may perform `action` right now.
///
/// Non-blocking: over-limit calls are rejected immediately and never queued.
/// A `true` answer consumes one unit of the caller's quota.
pub trait RateLimiter: Send + Sync {
    fn allow(&self, identity: &str, action: RateLimitedAction) -> bool;

    /// Calls per minute each identity may make for `action`.
    fn quota_per_minute(&self, action: RateLimitedAction) -> u32;
}
