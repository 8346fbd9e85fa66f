use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::state::{StatsQuery, TeamRecord};

/// Session-scoped memo of fetch results. Entries never expire; the input
/// space is two leagues by two seasons per credential pair, so the cache
/// stays tiny for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatsKey {
    credential_hash: [u8; 32],
    league_id: u32,
    season_id: u32,
}

impl StatsKey {
    pub fn for_query(query: &StatsQuery) -> Self {
        Self {
            credential_hash: credential_hash(&query.username, &query.password),
            league_id: query.league.id(),
            season_id: query.season.id(),
        }
    }
}

/// Keys carry a digest so plaintext credentials never sit in the map.
fn credential_hash(username: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[derive(Debug, Clone)]
pub struct CachedStats {
    pub records: Vec<TeamRecord>,
    pub fetched_at: u64,
}

#[derive(Default)]
pub struct StatsCache {
    entries: Mutex<HashMap<StatsKey, CachedStats>>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &StatsKey) -> Option<CachedStats> {
        let entries = self.entries.lock().expect("stats cache lock poisoned");
        entries.get(key).cloned()
    }

    pub fn store(&self, key: StatsKey, records: Vec<TeamRecord>, fetched_at: u64) {
        let mut entries = self.entries.lock().expect("stats cache lock poisoned");
        entries.insert(key, CachedStats { records, fetched_at });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("stats cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static SESSION_CACHE: Lazy<StatsCache> = Lazy::new(StatsCache::new);

pub fn session() -> &'static StatsCache {
    &SESSION_CACHE
}
