#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::{TestResponse, TestServer};
use linkcap::domain::entities::{Insertion, NewShortUrl, ShortUrl};
use linkcap::domain::repositories::ShortUrlRepository;
use linkcap::error::AppError;
use linkcap::infrastructure::cache::{CacheService, MemoryCache};
use linkcap::infrastructure::persistence::{InMemoryShortUrlRepository, InMemoryTokenRepository};
use linkcap::infrastructure::rate_limit::KeyedRateLimiter;
use linkcap::routes::router;
use linkcap::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const BASE_URL: &str = "http://localhost:3000";
pub const ALICE_TOKEN: &str = "alice-test-token";
pub const BOB_TOKEN: &str = "bob-test-token";
pub const REVOKED_TOKEN: &str = "revoked-test-token";

/// In-memory repository that counts redirect lookups.
#[derive(Default)]
pub struct CountingShortUrlRepository {
    inner: InMemoryShortUrlRepository,
    lookups: AtomicUsize,
}

impl CountingShortUrlRepository {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl ShortUrlRepository for CountingShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<Insertion, AppError> {
        self.inner.create(new_url).await
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_code(short_code).await
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortUrl>, AppError> {
        self.inner.list_by_owner(owner).await
    }

    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<bool, AppError> {
        self.inner.delete_by_id(id, owner).await
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub short_urls: Arc<CountingShortUrlRepository>,
    pub cache: Arc<MemoryCache>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(Duration::from_secs(900), 5).await
}

/// Builds the full router over in-memory stores, with tokens for `alice` and
/// `bob` plus one revoked token.
pub async fn spawn_app_with(redirect_ttl: Duration, creates_per_minute: u32) -> TestApp {
    let short_urls = Arc::new(CountingShortUrlRepository::default());
    let tokens = Arc::new(InMemoryTokenRepository::new());
    let cache = Arc::new(MemoryCache::new(1_000, redirect_ttl));

    let state = AppState::new(
        short_urls.clone(),
        tokens.clone(),
        cache.clone(),
        Arc::new(KeyedRateLimiter::per_minute(creates_per_minute)),
        BASE_URL.to_string(),
        "test-signing-secret".to_string(),
        redirect_ttl,
    );

    for (owner, token) in [("alice", ALICE_TOKEN), ("bob", BOB_TOKEN)] {
        state
            .auth_service
            .issue_token(owner, &format!("{owner} test"), Some(token.to_string()))
            .await
            .unwrap();
    }

    let (revoked, _) = state
        .auth_service
        .issue_token("carol", "carol revoked", Some(REVOKED_TOKEN.to_string()))
        .await
        .unwrap();
    {
        use linkcap::domain::repositories::TokenRepository;
        tokens.revoke_token(revoked.id).await.unwrap();
    }

    let server = TestServer::new(router(state)).unwrap();

    TestApp {
        server,
        short_urls,
        cache,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl TestApp {
    pub async fn create(&self, token: &str, long_url: &str) -> TestResponse {
        self.server
            .post("/api/shorten")
            .add_header("Authorization", bearer(token))
            .json(&json!({ "long_url": long_url }))
            .await
    }

    /// Creates a short URL and returns the response body, asserting 201.
    pub async fn create_ok(&self, token: &str, long_url: &str) -> Value {
        let response = self.create(token, long_url).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    pub async fn list(&self, token: &str) -> Vec<Value> {
        let response = self
            .server
            .get("/api/my-urls")
            .add_header("Authorization", bearer(token))
            .await;
        response.assert_status_ok();
        response.json::<Vec<Value>>()
    }

    pub async fn delete(&self, token: &str, id: i64) -> TestResponse {
        self.server
            .delete(&format!("/api/url/{}", id))
            .add_header("Authorization", bearer(token))
            .await
    }

    pub async fn cached(&self, short_code: &str) -> Option<String> {
        self.cache.get_url(short_code).await.unwrap()
    }
}
