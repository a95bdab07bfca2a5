//! Short URL creation, listing and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_long_url;

/// Maximum attempts at finding an unused short code.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Owner-facing operations on short URLs.
///
/// The cap on records per owner is enforced by the repository as part of the
/// insert; this service validates input, allocates codes and reports evictions.
pub struct ShortUrlService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
    base_url: String,
}

impl<R: ShortUrlRepository + ?Sized> ShortUrlService<R> {
    /// Creates a new service; `base_url` prefixes every returned short URL.
    pub fn new(repository: Arc<R>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into(),
        }
    }

    /// Creates a short URL for `owner`.
    ///
    /// Evicts the owner's oldest records beyond the cap before returning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `long_url` is not an absolute HTTP(S) URL.
    /// Returns [`AppError::Internal`] if no unused code is found after 10 attempts.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create_short_url(
        &self,
        owner: &str,
        long_url: &str,
    ) -> Result<ShortUrl, AppError> {
        let long_url = long_url.trim();

        validate_long_url(long_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL format",
                json!({ "long_url": [e.to_string()] }),
            )
        })?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_url = NewShortUrl {
                owner: owner.to_string(),
                long_url: long_url.to_string(),
                short_code: generate_code()?,
            };

            match self.repository.create(new_url).await {
                Ok(insertion) => {
                    if !insertion.evicted.is_empty() {
                        let codes: Vec<&str> = insertion
                            .evicted
                            .iter()
                            .map(|r| r.short_code.as_str())
                            .collect();
                        info!(owner, evicted = ?codes, "Evicted oldest short URLs over cap");
                        metrics::counter!("short_urls_evicted_total")
                            .increment(insertion.evicted.len() as u64);
                    }
                    metrics::counter!("short_urls_created_total").increment(1);
                    return Ok(insertion.created);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Short code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Lists the owner's short URLs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn list_short_urls(&self, owner: &str) -> Result<Vec<ShortUrl>, AppError> {
        self.repository.list_by_owner(owner).await
    }

    /// Deletes a short URL owned by `owner`.
    ///
    /// The cache is left untouched; a deleted code keeps redirecting until its
    /// cache entry expires.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the id is unknown *or* owned by someone
    /// else; the two cases are indistinguishable to the caller.
    pub async fn delete_short_url(&self, id: i64, owner: &str) -> Result<(), AppError> {
        if self.repository.delete_by_id(id, owner).await? {
            info!(id, owner, "Short URL deleted");
            Ok(())
        } else {
            Err(AppError::not_found(
                "URL not found or unauthorized",
                json!({ "id": id }),
            ))
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url_for(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_code)
    }

    /// Checks that the backing store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }
}
