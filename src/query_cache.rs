use std::collections::HashMap;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Game,
    Team,
    Season,
    Club,
    Roster,
    Stats,
    Scores,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: ResourceKind,
    pub id: u64,
    pub params: String,
}

impl CacheKey {
    pub fn new(resource: ResourceKind, id: u64) -> Self {
        Self {
            resource,
            id,
            params: String::new(),
        }
    }

    pub fn with_params(resource: ResourceKind, id: u64, params: impl Into<String>) -> Self {
        Self {
            resource,
            id,
            params: params.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: SystemTime,
}

/// Memoizes fetched or computed values for a fixed time window. Callers pass
/// `now` so expiry is deterministic under test.
#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry<V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CacheKey, now: SystemTime) -> Option<V> {
        let entry = self.entries.get(key)?;
        if !self.is_fresh(entry, now) {
            return None;
        }
        log::debug!("cache hit {:?}/{} {:?}", key.resource, key.id, key.params);
        Some(entry.value.clone())
    }

    pub fn insert(&mut self, key: CacheKey, value: V, now: SystemTime) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    pub fn get_or_insert_with(
        &mut self,
        key: CacheKey,
        now: SystemTime,
        compute: impl FnOnce() -> V,
    ) -> V {
        if let Some(v) = self.get(&key, now) {
            return v;
        }
        let value = compute();
        self.insert(key, value.clone(), now);
        value
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every params variant cached for one resource id.
    pub fn invalidate_resource(&mut self, resource: ResourceKind, id: u64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|k, _| !(k.resource == resource && k.id == id));
        before - self.entries.len()
    }

    pub fn purge_expired(&mut self, now: SystemTime) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, e| match now.duration_since(e.fetched_at) {
            Ok(age) => age < ttl,
            Err(_) => true,
        });
        before - self.entries.len()
    }

    // Entries stamped in the future (clock moved back) count as fresh.
    fn is_fresh(&self, entry: &CacheEntry<V>, now: SystemTime) -> bool {
        match now.duration_since(entry.fetched_at) {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        }
    }
}
