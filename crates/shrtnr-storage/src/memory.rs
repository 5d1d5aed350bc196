use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use shrtnr_core::store::{KeyValueStore, Result};
use shrtnr_core::{Clock, StoreError, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// In-memory storage entry for one hash key.
#[derive(Debug, Clone, Default)]
struct Entry {
    fields: HashMap<String, String>,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

fn expire_at(now: Timestamp, ttl: Duration) -> Timestamp {
    let ttl = SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX);
    now.checked_add(ttl).unwrap_or(Timestamp::MAX)
}

/// In-memory implementation of [`KeyValueStore`] using DashMap.
///
/// Expiry is lazy: an expired key is treated as missing and dropped the next
/// time it is touched. Keys that are never touched again stay in memory until
/// [`InMemoryStore::purge_expired`] sweeps them. Time comes from the injected
/// [`Clock`], which lets tests expire records without sleeping.
///
/// Clones share the same data.
#[derive(Debug, Clone)]
pub struct InMemoryStore<C = SystemClock> {
    hashes: Arc<DashMap<String, Entry>>,
    counters: Arc<DashMap<String, u64>>,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    /// Creates a new in-memory store that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            hashes: Arc::new(DashMap::new()),
            counters: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of hash keys that have not expired.
    pub fn live_keys(&self) -> usize {
        let now = self.clock.now();
        self.hashes.iter().filter(|e| !e.is_expired(now)).count()
    }

    /// Drops every expired key and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut purged = 0;
        self.hashes.retain(|_, entry| {
            let expired = entry.is_expired(now);
            purged += usize::from(expired);
            !expired
        });
        if purged > 0 {
            debug!(purged, "Purged expired keys");
        }
        purged
    }
}

#[async_trait]
impl<C: Clock> KeyValueStore for InMemoryStore<C> {
    async fn incr(&self, key: &str) -> Result<u64> {
        let mut value = self.counters.entry(key.to_owned()).or_insert(0);
        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::Operation(format!("counter '{key}' overflowed")))?;
        Ok(*value)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let now = self.clock.now();

        let Some(entry) = self.hashes.get(key) else {
            return Ok(None);
        };

        if entry.is_expired(now) {
            drop(entry);
            self.hashes.remove_if(key, |_, e| e.is_expired(now));
            return Ok(None);
        }

        Ok(entry.fields.get(field).cloned())
    }

    async fn hset(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let now = self.clock.now();
        let mut entry = self.hashes.entry(key.to_owned()).or_default();
        if entry.is_expired(now) {
            *entry = Entry::default();
        }

        entry.fields.insert(field.to_owned(), value.to_owned());
        if let Some(ttl) = ttl {
            entry.expire_at = Some(expire_at(now, ttl));
        }
        Ok(())
    }

    async fn hset_nx(
        &self,
        key: &str,
        field: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let now = self.clock.now();
        // The entry guard holds the shard lock, so check-and-set is atomic.
        let mut entry = self.hashes.entry(key.to_owned()).or_default();
        if entry.is_expired(now) {
            *entry = Entry::default();
        }

        if entry.fields.contains_key(field) {
            return Ok(false);
        }

        entry.fields.insert(field.to_owned(), value.to_owned());
        if let Some(ttl) = ttl {
            entry.expire_at = Some(expire_at(now, ttl));
        }
        Ok(true)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .hashes
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shrtnr_core::ManualClock;

    fn store() -> (InMemoryStore<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (InMemoryStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn incr_starts_at_one() {
        let (store, _) = store();
        assert_eq!(store.incr("c").await.unwrap(), 1);
        assert_eq!(store.incr("c").await.unwrap(), 2);
        assert_eq!(store.incr("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_and_get_fields() {
        let (store, _) = store();
        store.hset("k", "a", "1", None).await.unwrap();
        store.hset("k", "b", "2", None).await.unwrap();

        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.hget("k", "b").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.hget("k", "c").await.unwrap(), None);
        assert_eq!(store.hget("missing", "a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hset_overwrites() {
        let (store, _) = store();
        store.hset("k", "a", "1", None).await.unwrap();
        store.hset("k", "a", "2", None).await.unwrap();
        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn hset_nx_keeps_first_value() {
        let (store, _) = store();
        assert!(store.hset_nx("k", "a", "1", None).await.unwrap());
        assert!(!store.hset_nx("k", "a", "2", None).await.unwrap());
        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn records_expire_with_the_clock() {
        let (store, clock) = store();
        store
            .hset("k", "a", "1", Some(Duration::from_secs(10)))
            .await
            .unwrap();

        clock.advance(Duration::from_secs(9));
        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("1"));

        clock.advance(Duration::from_secs(1));
        assert_eq!(store.hget("k", "a").await.unwrap(), None);
        assert_eq!(store.live_keys(), 0);
    }

    #[tokio::test]
    async fn hset_nx_over_expired_key() {
        let (store, clock) = store();
        store
            .hset("k", "a", "old", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(2));

        assert!(store.hset_nx("k", "a", "new", None).await.unwrap());
        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("new"));

        // the fresh record does not inherit the old expiry
        clock.advance(Duration::from_secs(3600));
        assert_eq!(store.hget("k", "a").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn hset_without_ttl_keeps_existing_expiry() {
        let (store, clock) = store();
        store
            .hset("k", "a", "1", Some(Duration::from_secs(5)))
            .await
            .unwrap();
        store.hset("k", "b", "2", None).await.unwrap();

        clock.advance(Duration::from_secs(5));
        assert_eq!(store.hget("k", "b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn del_reports_existence() {
        let (store, clock) = store();
        store.hset("k", "a", "1", None).await.unwrap();
        assert!(store.del("k").await.unwrap());
        assert!(!store.del("k").await.unwrap());

        store
            .hset("e", "a", "1", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(1));
        assert!(!store.del("e").await.unwrap());
    }

    #[tokio::test]
    async fn purge_expired_drops_untouched_keys() {
        let (store, clock) = store();
        store
            .hset("short-lived", "a", "1", Some(Duration::from_secs(5)))
            .await
            .unwrap();
        store
            .hset("long-lived", "a", "1", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        store.hset("permanent", "a", "1", None).await.unwrap();

        assert_eq!(store.purge_expired(), 0);

        clock.advance(Duration::from_secs(5));
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.hashes.len(), 2);

        clock.advance(Duration::from_secs(55));
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.hashes.len(), 1);
        assert_eq!(
            store.hget("permanent", "a").await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn clones_share_data() {
        let (store, _) = store();
        let other = store.clone();
        store.hset("k", "a", "1", None).await.unwrap();
        assert_eq!(other.hget("k", "a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(other.incr("c").await.unwrap(), 1);
        assert_eq!(store.incr("c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_increments_are_unique() {
        let store = InMemoryStore::new();
        let mut handles = vec![];

        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut seen = Vec::with_capacity(100);
                for _ in 0..100 {
                    seen.push(store.incr("c").await.unwrap());
                }
                seen
            }));
        }

        let mut all = vec![];
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all.sort_unstable();
        assert_eq!(all, (1..=800).collect::<Vec<u64>>());
    }
}
