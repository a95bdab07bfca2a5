//! Cached short code resolution for the public redirect path.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Default freshness window for cached redirects.
pub const DEFAULT_REDIRECT_TTL: Duration = Duration::from_secs(900);

/// Resolves short codes, consulting the cache before the repository.
///
/// # Algorithm
///
/// 1. Look the code up in the cache. A cache error counts as a miss.
/// 2. On a hit, return the cached URL without re-checking the repository.
/// 3. On a miss, read the repository. Found codes are cached for `ttl`;
///    unknown codes are reported as not found and never cached.
///
/// Deleting or evicting a record does not touch the cache, so a removed code
/// keeps resolving until its entry expires.
pub struct RedirectService<R: ShortUrlRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    ttl: Duration,
}

impl<R: ShortUrlRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service caching hits for `ttl`.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    /// Returns the long URL for `short_code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::StoreUnavailable`] if the repository fails on a miss;
    /// there is no retry.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        match self.cache.get_url(short_code).await {
            Ok(Some(long_url)) => {
                metrics::counter!("redirect_cache_hits_total").increment(1);
                return Ok(long_url);
            }
            Ok(None) => {
                metrics::counter!("redirect_cache_misses_total").increment(1);
            }
            Err(e) => {
                warn!(error = %e, short_code, "Cache lookup failed, falling back to store");
                metrics::counter!("redirect_cache_errors_total").increment(1);
            }
        }

        let record = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "short_code": short_code }))
            })?;

        if let Err(e) = self
            .cache
            .set_url(short_code, &record.long_url, Some(self.ttl))
            .await
        {
            warn!(error = %e, short_code, "Failed to cache redirect");
        } else {
            debug!(short_code, ttl_secs = self.ttl.as_secs(), "Redirect cached");
        }

        Ok(record.long_url)
    }

    /// Reports whether the cache backend is healthy, with its label.
    pub async fn cache_health(&self) -> (bool, &'static str) {
        (self.cache.health_check().await, self.cache.backend())
    }
}
