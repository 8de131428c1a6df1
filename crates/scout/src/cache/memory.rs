//! In-process cache tier — a mutex-guarded bounded map.
//!
//! Eviction is by insertion order (FIFO), not recency of access: once
//! capacity is reached, the earliest-inserted key is evicted no matter how
//! recently it was read. Overwriting an existing key keeps its original
//! insertion position.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::Utc;

use super::CacheEntry;

struct Inner {
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
}

pub struct MemoryTier {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl MemoryTier {
    pub fn new(capacity: usize) -> Self {
        MemoryTier {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
        }
    }

    /// Returns a clone of the entry if present and not expired. Expired
    /// entries are purged on the spot.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut inner = self.lock();
        match inner.entries.get(key) {
            Some(entry) if !entry.is_expired(Utc::now()) => Some(entry.clone()),
            Some(_) => {
                inner.entries.remove(key);
                inner.insertion_order.retain(|k| k.as_str() != key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, entry: CacheEntry) {
        let mut inner = self.lock();
        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, entry);
            return;
        }
        while inner.entries.len() >= self.capacity {
            match inner.insertion_order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.entries.insert(key.clone(), entry);
        inner.insertion_order.push_back(key);
    }

    /// Removes expired entries, returning how many were purged.
    pub fn remove_expired(&self) -> usize {
        let now = Utc::now();
        let mut inner = self.lock();
        let stale: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            inner.entries.remove(key);
        }
        inner.insertion_order.retain(|k| !stale.contains(k));
        stale.len()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory cache lock poisoned")
    }
}
