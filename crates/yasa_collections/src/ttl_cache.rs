use std::{
    borrow::Borrow,
    collections::HashMap,
    hash::Hash,
    time::{Duration, Instant},
};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_access: Instant,
}

/// A small cache with a bounded number of entries which expire after being
/// idle (neither read nor written) for longer than `ttl`.
///
/// When full, inserting evicts the least recently accessed entry.
/// Values are handed out by clone, so they are usually `Rc`s.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            ttl,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get_at(key, Instant::now())
    }

    pub fn get_at<Q: ?Sized>(&mut self, key: &Q, now: Instant) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let ttl = self.ttl;
        let expired = match self.entries.get_mut(key) {
            None => return None,
            Some(entry) if now.saturating_duration_since(entry.last_access) >= ttl => true,
            Some(entry) => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
        };

        if expired {
            self.entries.remove(key);
        }

        None
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now())
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        if self.capacity == 0 {
            return;
        }

        self.purge_expired_at(now);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }

        self.entries.insert(
            key,
            Entry {
                value,
                last_access: now,
            },
        );
    }

    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Drops every entry which has been idle for at least `ttl`.
    pub fn purge_expired_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.last_access) < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());

        if let Some(oldest) = oldest {
            self.entries.remove(&oldest);
        }
    }
}
