//! Process-local repository implementations.
//!
//! Backed by a mutex-guarded vector each. Every operation takes the lock once,
//! so create-and-evict is atomic with respect to other callers. Useful for tests
//! and for embedding the service without PostgreSQL; nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Insertion, NewShortUrl, OWNER_URL_CAP, ShortUrl, sort_newest_first};
use crate::domain::repositories::{ApiToken, ShortUrlRepository, TokenRepository};
use crate::error::AppError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::store_unavailable("In-memory store poisoned", json!({})))
}

#[derive(Default)]
struct ShortUrlTable {
    next_id: i64,
    rows: Vec<ShortUrl>,
}

/// In-memory [`ShortUrlRepository`].
#[derive(Default)]
pub struct InMemoryShortUrlRepository {
    table: Mutex<ShortUrlTable>,
}

impl InMemoryShortUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored, across all owners.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ShortUrlRepository for InMemoryShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<Insertion, AppError> {
        let mut table = lock(&self.table)?;

        if table.rows.iter().any(|r| r.short_code == new_url.short_code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_urls_short_code_key" }),
            ));
        }

        table.next_id += 1;
        let created = ShortUrl::new(
            table.next_id,
            new_url.owner,
            new_url.long_url,
            new_url.short_code,
            Utc::now(),
        );
        table.rows.push(created.clone());

        let mut owned: Vec<ShortUrl> = table
            .rows
            .iter()
            .filter(|r| r.owner == created.owner)
            .cloned()
            .collect();
        sort_newest_first(&mut owned);

        let evicted: Vec<ShortUrl> = owned.into_iter().skip(OWNER_URL_CAP).collect();
        if !evicted.is_empty() {
            table
                .rows
                .retain(|r| !evicted.iter().any(|e| e.id == r.id));
        }

        Ok(Insertion { created, evicted })
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .iter()
            .find(|r| r.short_code == short_code)
            .cloned())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<ShortUrl>, AppError> {
        let table = lock(&self.table)?;
        let mut owned: Vec<ShortUrl> = table
            .rows
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut owned);
        Ok(owned)
    }

    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<bool, AppError> {
        let mut table = lock(&self.table)?;
        let before = table.rows.len();
        table.rows.retain(|r| !(r.id == id && r.owner == owner));
        Ok(table.rows.len() < before)
    }

    async fn health_check(&self) -> bool {
        self.table.lock().is_ok()
    }
}

#[derive(Default)]
struct TokenTable {
    next_id: i64,
    rows: Vec<ApiToken>,
}

/// In-memory [`TokenRepository`].
#[derive(Default)]
pub struct InMemoryTokenRepository {
    table: Mutex<TokenTable>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_owner(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .map(|t| t.owner.clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut table = lock(&self.table)?;
        if let Some(token) = table
            .rows
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        owner: &str,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut table = lock(&self.table)?;

        if table
            .rows
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_name_key" }),
            ));
        }

        table.next_id += 1;
        let token = ApiToken {
            id: table.next_id,
            owner: owner.to_string(),
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        table.rows.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let table = lock(&self.table)?;
        let mut tokens = table.rows.clone();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let table = lock(&self.table)?;
        Ok(table.rows.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut table = lock(&self.table)?;
        if let Some(token) = table
            .rows
            .iter_mut()
            .find(|t| t.id == id && !t.is_revoked())
        {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_url(owner: &str, long_url: &str, code: &str) -> NewShortUrl {
        NewShortUrl {
            owner: owner.to_string(),
            long_url: long_url.to_string(),
            short_code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_code() {
        let repo = InMemoryShortUrlRepository::new();

        let insertion = repo
            .create(new_url("alice", "https://example.com", "abc123"))
            .await
            .unwrap();

        assert_eq!(insertion.created.id, 1);
        assert!(insertion.evicted.is_empty());

        let found = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.long_url, "https://example.com");
        assert!(repo.find_by_code("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let repo = InMemoryShortUrlRepository::new();
        repo.create(new_url("alice", "https://a.com", "dup"))
            .await
            .unwrap();

        let result = repo.create(new_url("bob", "https://b.com", "dup")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let repo = InMemoryShortUrlRepository::new();

        for (i, url) in ["https://a.com", "https://b.com", "https://c.com"]
            .iter()
            .enumerate()
        {
            let insertion = repo
                .create(new_url("alice", url, &format!("c{i}")))
                .await
                .unwrap();
            assert!(insertion.evicted.is_empty());
        }

        let insertion = repo
            .create(new_url("alice", "https://d.com", "c3"))
            .await
            .unwrap();

        assert_eq!(insertion.evicted.len(), 1);
        assert_eq!(insertion.evicted[0].long_url, "https://a.com");

        let urls: Vec<String> = repo
            .list_by_owner("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.long_url)
            .collect();
        assert_eq!(urls, vec!["https://d.com", "https://c.com", "https://b.com"]);
        assert!(repo.find_by_code("c0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cap_is_per_owner() {
        let repo = InMemoryShortUrlRepository::new();

        for i in 0..3 {
            repo.create(new_url("alice", "https://a.com", &format!("a{i}")))
                .await
                .unwrap();
        }
        let insertion = repo
            .create(new_url("bob", "https://b.com", "b0"))
            .await
            .unwrap();

        assert!(insertion.evicted.is_empty());
        assert_eq!(repo.list_by_owner("alice").await.unwrap().len(), 3);
        assert_eq!(repo.list_by_owner("bob").await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_respect_cap() {
        let repo = std::sync::Arc::new(InMemoryShortUrlRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_url("alice", "https://a.com", &format!("c{i}")))
                        .await
                })
            })
            .collect();

        let mut evicted = 0;
        for handle in handles {
            evicted += handle.await.unwrap().unwrap().evicted.len();
        }

        assert_eq!(repo.list_by_owner("alice").await.unwrap().len(), 3);
        assert_eq!(repo.len(), 3);
        assert_eq!(evicted, 29);
    }

    #[tokio::test]
    async fn test_equal_timestamps_evict_lowest_id() {
        let repo = InMemoryShortUrlRepository::new();
        let now = Utc::now();
        {
            let mut table = repo.table.lock().unwrap();
            for code in ["a", "b", "c"] {
                table.next_id += 1;
                let id = table.next_id;
                table.rows.push(ShortUrl::new(
                    id,
                    "alice".to_string(),
                    format!("https://{code}.com"),
                    code.to_string(),
                    now,
                ));
            }
        }

        let insertion = repo
            .create(new_url("alice", "https://d.com", "d"))
            .await
            .unwrap();

        assert_eq!(insertion.evicted.len(), 1);
        assert_eq!(insertion.evicted[0].short_code, "a");

        let codes: Vec<String> = repo
            .list_by_owner("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.short_code)
            .collect();
        assert_eq!(codes, vec!["d", "c", "b"]);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let repo = InMemoryShortUrlRepository::new();
        let created = repo
            .create(new_url("alice", "https://a.com", "abc"))
            .await
            .unwrap()
            .created;

        assert!(!repo.delete_by_id(created.id, "bob").await.unwrap());
        assert!(!repo.delete_by_id(999, "alice").await.unwrap());
        assert!(repo.delete_by_id(created.id, "alice").await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let repo = InMemoryTokenRepository::new();

        let token = repo.create_token("alice", "laptop", "hash1").await.unwrap();
        assert_eq!(
            repo.find_owner("hash1").await.unwrap(),
            Some("alice".to_string())
        );

        repo.update_last_used("hash1").await.unwrap();
        let stored = repo.find_by_name("laptop").await.unwrap().unwrap();
        assert!(stored.last_used_at.is_some());

        repo.revoke_token(token.id).await.unwrap();
        assert!(repo.find_owner("hash1").await.unwrap().is_none());
        assert!(repo.find_by_id(token.id).await.unwrap().unwrap().is_revoked());
    }

    #[tokio::test]
    async fn test_token_name_must_be_unique() {
        let repo = InMemoryTokenRepository::new();
        repo.create_token("alice", "laptop", "hash1").await.unwrap();

        let result = repo.create_token("bob", "laptop", "hash2").await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }
}
