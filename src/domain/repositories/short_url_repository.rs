//! Repository trait for short URL records.

use crate::domain::entities::{Insertion, NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Authoritative store of [`ShortUrl`] records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortUrlRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a record and enforces the per-owner cap.
    ///
    /// After the insert, the owner's records are ordered newest first and every
    /// record beyond [`crate::domain::entities::OWNER_URL_CAP`] is deleted. Both
    /// steps complete before this returns, and concurrent creations by the same
    /// owner are serialized.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn create(&self, new_url: NewShortUrl) -> Result<Insertion, AppError>;

    /// Finds a record by its exact short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Lists all records of an owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortUrl>, AppError>;

    /// Deletes a record if it exists and belongs to `owner`.
    ///
    /// Returns `Ok(false)` both when the id is unknown and when it belongs to
    /// someone else.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<bool, AppError>;

    /// Checks that the backing store answers queries.
    async fn health_check(&self) -> bool;
}
