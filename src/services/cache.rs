// src/services/cache.rs

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug)]
struct Entries<V> {
    values: HashMap<String, V>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Process-wide memo table keyed by content digest.
///
/// Holds at most `capacity` entries; the oldest insert is evicted first.
/// Only avoids recomputation; nothing relies on an entry being present.
#[derive(Debug)]
pub struct MemoCache<V> {
    entries: Arc<Mutex<Entries<V>>>,
    capacity: usize,
}

impl<V> Clone for MemoCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            capacity: self.capacity,
        }
    }
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V> MemoCache<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                values: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity: capacity.max(1),
        }
    }
}

impl<V: Clone> MemoCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if entries.values.insert(key.clone(), value).is_some() {
            return;
        }
        entries.order.push_back(key);

        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.values.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let cache: MemoCache<String> = MemoCache::new();
        let other = cache.clone();

        cache.insert("k".to_string(), "v".to_string());
        assert_eq!(other.get("k").as_deref(), Some("v"));
        assert_eq!(other.len(), 1);
        assert!(other.get("missing").is_none());
    }

    #[test]
    fn evicts_oldest_entry_when_full() {
        let cache: MemoCache<u32> = MemoCache::with_capacity(2);

        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        // Overwriting an existing key does not count as a new entry.
        cache.insert("a".to_string(), 10);
        assert_eq!(cache.len(), 2);

        cache.insert("c".to_string(), 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }
}
