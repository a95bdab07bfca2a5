//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ShortUrlRepository`] - Short URL records with per-owner cap eviction
//! - [`TokenRepository`] - API token authentication

pub mod short_url_repository;
pub mod token_repository;

pub use short_url_repository::ShortUrlRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
