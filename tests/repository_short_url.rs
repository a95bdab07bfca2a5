use linkcap::domain::entities::NewShortUrl;
use linkcap::domain::repositories::ShortUrlRepository;
use linkcap::error::AppError;
use linkcap::infrastructure::persistence::PgShortUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_url(owner: &str, long_url: &str, code: &str) -> NewShortUrl {
    NewShortUrl {
        owner: owner.to_string(),
        long_url: long_url.to_string(),
        short_code: code.to_string(),
    }
}

async fn insert_at(pool: &PgPool, owner: &str, code: &str, created_at: &str) {
    sqlx::query(
        "INSERT INTO short_urls (owner, long_url, short_code, created_at) VALUES ($1, $2, $3, $4::timestamptz)",
    )
    .bind(owner)
    .bind(format!("https://example.com/{code}"))
    .bind(code)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
async fn test_create_and_find_by_code(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool));

    let insertion = repo
        .create(new_url("alice", "https://example.com", "code00000001"))
        .await
        .unwrap();

    assert!(insertion.evicted.is_empty());
    assert_eq!(insertion.created.owner, "alice");

    let found = repo.find_by_code("code00000001").await.unwrap().unwrap();
    assert_eq!(found, insertion.created);
    assert!(repo.find_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool));

    repo.create(new_url("alice", "https://a.example", "samecode"))
        .await
        .unwrap();
    let result = repo
        .create(new_url("bob", "https://b.example", "samecode"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
    assert!(repo.list_by_owner("bob").await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_fourth_insert_evicts_oldest(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool.clone()));

    insert_at(&pool, "alice", "a", "2026-01-01T00:00:00Z").await;
    insert_at(&pool, "alice", "b", "2026-01-01T00:01:00Z").await;
    insert_at(&pool, "alice", "c", "2026-01-01T00:02:00Z").await;

    let insertion = repo
        .create(new_url("alice", "https://example.com/d", "d"))
        .await
        .unwrap();

    let evicted: Vec<&str> = insertion
        .evicted
        .iter()
        .map(|r| r.short_code.as_str())
        .collect();
    assert_eq!(evicted, vec!["a"]);

    let codes: Vec<String> = repo
        .list_by_owner("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.short_code)
        .collect();
    assert_eq!(codes, vec!["d", "c", "b"]);
}

#[sqlx::test]
async fn test_equal_timestamps_evict_lowest_id(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool.clone()));

    for code in ["a", "b", "c"] {
        insert_at(&pool, "alice", code, "2026-01-01T00:00:00Z").await;
    }

    let insertion = repo
        .create(new_url("alice", "https://example.com/d", "d"))
        .await
        .unwrap();

    assert_eq!(insertion.evicted.len(), 1);
    assert_eq!(insertion.evicted[0].short_code, "a");
}

#[sqlx::test]
async fn test_cap_does_not_touch_other_owners(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool.clone()));

    for code in ["b1", "b2", "b3"] {
        insert_at(&pool, "bob", code, "2026-01-01T00:00:00Z").await;
    }
    for i in 0..4 {
        repo.create(new_url("alice", "https://example.com", &format!("a{i}")))
            .await
            .unwrap();
    }

    assert_eq!(repo.list_by_owner("alice").await.unwrap().len(), 3);
    assert_eq!(repo.list_by_owner("bob").await.unwrap().len(), 3);
}

#[sqlx::test]
async fn test_concurrent_creates_respect_cap(pool: PgPool) {
    let repo = Arc::new(PgShortUrlRepository::new(Arc::new(pool)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(new_url("alice", "https://example.com", &format!("c{i}")))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.list_by_owner("alice").await.unwrap().len(), 3);
}

#[sqlx::test]
async fn test_delete_requires_owner(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool));

    let created = repo
        .create(new_url("alice", "https://example.com", "mine"))
        .await
        .unwrap()
        .created;

    assert!(!repo.delete_by_id(created.id, "bob").await.unwrap());
    assert!(repo.find_by_code("mine").await.unwrap().is_some());

    assert!(repo.delete_by_id(created.id, "alice").await.unwrap());
    assert!(repo.find_by_code("mine").await.unwrap().is_none());

    assert!(!repo.delete_by_id(created.id, "alice").await.unwrap());
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let repo = PgShortUrlRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
