//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AuthService, RedirectService, ShortUrlService};
use crate::domain::repositories::{ShortUrlRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::rate_limit::RateLimiter;

/// Handles to the services, constructed once at startup.
///
/// Everything is behind `Arc`, so cloning per request is cheap. Services are
/// parameterized over trait objects so tests can swap in in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub short_url_service: Arc<ShortUrlService<dyn ShortUrlRepository>>,
    pub redirect_service: Arc<RedirectService<dyn ShortUrlRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Wires services around the given repositories, cache and limiter.
    ///
    /// The redirect path and the management endpoints share one repository
    /// instance.
    pub fn new(
        short_urls: Arc<dyn ShortUrlRepository>,
        tokens: Arc<dyn TokenRepository>,
        cache: Arc<dyn CacheService>,
        rate_limiter: Arc<dyn RateLimiter>,
        base_url: String,
        token_signing_secret: String,
        redirect_ttl: Duration,
    ) -> Self {
        Self {
            short_url_service: Arc::new(ShortUrlService::new(short_urls.clone(), base_url)),
            redirect_service: Arc::new(RedirectService::new(short_urls, cache, redirect_ttl)),
            auth_service: Arc::new(AuthService::new(tokens, token_signing_secret)),
            rate_limiter,
        }
    }
}
