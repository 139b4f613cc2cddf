use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Minimal expiring cache. Entries are evicted lazily on read; there is
/// no background sweeper, so stale entries for keys that are never read
/// again simply stay until overwritten.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.entries.get(key) {
            Some((stored_at, _)) if stored_at.elapsed() >= self.ttl => {
                self.entries.remove(key);
                None
            }
            _ => self.entries.get(key).map(|(_, value)| value),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, (Instant::now(), value));
    }
}
