//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (moka, Redis, no-op)
//! - [`persistence`] - PostgreSQL and in-memory repositories
//! - [`rate_limit`] - Keyed per-user rate limiter

pub mod cache;
pub mod persistence;
pub mod rate_limit;
