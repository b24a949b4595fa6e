// In memory TTL cache of month loads.
//
// Purpose
// - Skip a remote month load when the same (user, month, year) was loaded
//   recently in this session.
//
// Responsibilities
// - Map a month key to the ids that load returned, with an expiry.
// - Expire lazily on `get` and in bulk on `cleanup`.
//
// Boundaries
// - Only ids are kept, not event bodies. A hit assumes the bodies are already
//   resident in the store from the load that populated the entry.

use crate::shared::core::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub month_key: String,
    pub event_ids: Vec<String>,
    pub loaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// `"{user}:{year}-{month}"` with a 1-based, zero-padded month.
/// The suffix never contains `:`, so splitting on the last `:` recovers the user.
pub fn month_key(user_id: &str, month: u32, year: i32) -> String {
    format!("{user_id}:{year:04}-{:02}", month.saturating_add(1))
}

pub struct EventCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_TTL_MINUTES))
    }
}

impl EventCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let mut entries = self.entries();
        let live = match entries.get(key).map(|entry| now > entry.expires_at) {
            Some(true) => {
                entries.remove(key);
                None
            }
            Some(false) => entries.get(key).cloned(),
            None => None,
        };
        drop(entries);

        let counter = if live.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        live
    }

    pub fn set(&self, key: &str, event_ids: Vec<String>) -> CacheEntry {
        let now = self.clock.now();
        let entry = CacheEntry {
            month_key: key.to_string(),
            event_ids,
            loaded_at: now,
            expires_at: now + self.ttl,
        };
        self.entries().insert(key.to_string(), entry.clone());
        entry
    }

    pub fn invalidate(&self, key: &str) {
        self.entries().remove(key);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
