//! Per-user rate limiting for write operations.

mod keyed_limiter;
mod service;

pub use keyed_limiter::KeyedRateLimiter;
pub use service::{RateLimitedAction, RateLimiter};
