//! Short URL entity owned by an authenticated user.

use chrono::{DateTime, Utc};

/// Maximum number of short URLs a single owner may hold at any settled time.
///
/// Creating one more evicts the oldest records beyond this count.
pub const OWNER_URL_CAP: usize = 3;

/// A persisted short code → long URL mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub owner: String,
    pub long_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

impl ShortUrl {
    /// Creates a new ShortUrl instance.
    pub fn new(
        id: i64,
        owner: String,
        long_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            long_url,
            short_code,
            created_at,
        }
    }

    /// Returns true if `identity` owns this record.
    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.owner == identity
    }
}

/// Input data for creating a new short URL.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub owner: String,
    pub long_url: String,
    pub short_code: String,
}

/// Outcome of an insert: the new record plus whatever the cap evicted.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub created: ShortUrl,
    /// Records of the same owner deleted to restore the cap, oldest last.
    pub evicted: Vec<ShortUrl>,
}

/// Sorts records newest first.
///
/// `created_at` collisions fall back to the insertion sequence (`id`), so the
/// record inserted later counts as newer.
pub fn sort_newest_first(records: &mut [ShortUrl]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
