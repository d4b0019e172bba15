//! Time-bounded snapshot cache for remote list results.
//!
//! Entries pair a value with the instant it was stored and expire after
//! [`CACHE_TTL`]. Expiry is checked on read; there is no background sweeper.
//! A stale entry behaves exactly like a missing one and is removed on the
//! read that finds it expired.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a cached snapshot may serve reads before a refetch is required.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

pub struct SnapshotCache<T> {
    entries: HashMap<String, Entry<T>>,
    ttl: Duration,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn get(&mut self, key: &str) -> Option<&T> {
        self.get_at(key, Instant::now())
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop everything, for logout or an invalidated session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_at(&mut self, key: impl Into<String>, value: T, now: Instant) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<&T> {
        let expired = match self.entries.get(key) {
            Some(entry) => now.duration_since(entry.stored_at) >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> SnapshotCache<Vec<u32>> {
        SnapshotCache::new(Duration::from_secs(300))
    }

    #[test]
    fn fresh_entry_is_served() {
        let mut c = cache();
        let now = Instant::now();
        c.insert_at("q", vec![1, 2], now);
        assert_eq!(c.get_at("q", now), Some(&vec![1, 2]));
    }

    #[test]
    fn entry_just_inside_ttl_is_served() {
        let mut c = cache();
        let now = Instant::now();
        c.insert_at("q", vec![1], now);
        let later = now + Duration::from_secs(299);
        assert_eq!(c.get_at("q", later), Some(&vec![1]));
    }

    #[test]
    fn entry_at_ttl_boundary_is_expired() {
        let mut c = cache();
        let now = Instant::now();
        c.insert_at("q", vec![1], now);
        assert!(c.get_at("q", now + Duration::from_secs(300)).is_none());
        // The expired read also removed the entry.
        assert!(c.is_empty());
    }

    #[test]
    fn entries_expire_independently() {
        let mut c = cache();
        let now = Instant::now();
        c.insert_at("old", vec![1], now);
        c.insert_at("new", vec![2], now + Duration::from_secs(200));
        let later = now + Duration::from_secs(350);
        assert!(c.get_at("old", later).is_none());
        assert_eq!(c.get_at("new", later), Some(&vec![2]));
    }

    #[test]
    fn reinsert_resets_the_clock() {
        let mut c = cache();
        let now = Instant::now();
        c.insert_at("q", vec![1], now);
        c.insert_at("q", vec![2], now + Duration::from_secs(250));
        let later = now + Duration::from_secs(400);
        assert_eq!(c.get_at("q", later), Some(&vec![2]));
    }

    #[test]
    fn invalidate_removes_single_key() {
        let mut c = cache();
        c.insert("a", vec![1]);
        c.insert("b", vec![2]);
        c.invalidate("a");
        assert!(c.get("a").is_none());
        assert!(c.get("b").is_some());
    }

    #[test]
    fn clear_empties_cache() {
        let mut c = cache();
        c.insert("a", vec![1]);
        c.clear();
        assert!(c.is_empty());
    }
}
