//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
struct CachedUrl {
    long_url: String,
    ttl: Duration,
}

/// Expires every entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory cache with per-entry expiry.
///
/// Each instance owns its storage, so tests can run against isolated caches.
/// Expired entries are never returned; moka reclaims them lazily.
pub struct MemoryCache {
    entries: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            entries,
            default_ttl,
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        match self.entries.get(short_code).await {
            Some(entry) => {
                debug!("Cache HIT: {}", short_code);
                Ok(Some(entry.long_url))
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);

        self.entries
            .insert(
                short_code.to_string(),
                CachedUrl {
                    long_url: long_url.to_string(),
                    ttl,
                },
            )
            .await;

        debug!("Cache SET: {} (TTL: {}s)", short_code, ttl.as_secs());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(100, Duration::from_secs(900));

        cache
            .set_url("abc123", "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc123").await.unwrap(),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCache::new(100, Duration::from_secs(900));
        assert!(cache.get_url("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_entry() {
        let cache = MemoryCache::new(100, Duration::from_secs(900));

        cache.set_url("k", "https://old.com", None).await.unwrap();
        cache.set_url("k", "https://new.com", None).await.unwrap();

        assert_eq!(
            cache.get_url("k").await.unwrap(),
            Some("https://new.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(100, Duration::from_secs(900));

        cache
            .set_url("short", "https://example.com", Some(Duration::from_millis(200)))
            .await
            .unwrap();
        assert!(cache.get_url("short").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(cache.get_url("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let first = MemoryCache::new(100, Duration::from_secs(900));
        let second = MemoryCache::new(100, Duration::from_secs(900));

        first.set_url("abc", "https://a.com", None).await.unwrap();

        assert!(second.get_url("abc").await.unwrap().is_none());
    }
}
