//! Repository implementations.
//!
//! - [`PgShortUrlRepository`] / [`PgTokenRepository`] - PostgreSQL via SQLx
//! - [`InMemoryShortUrlRepository`] / [`InMemoryTokenRepository`] - process-local

pub mod memory;
pub mod pg_short_url_repository;
pub mod pg_token_repository;

pub use memory::{InMemoryShortUrlRepository, InMemoryTokenRepository};
pub use pg_short_url_repository::PgShortUrlRepository;
pub use pg_token_repository::PgTokenRepository;
