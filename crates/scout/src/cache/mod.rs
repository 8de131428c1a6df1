//! Two-tier cache — a bounded in-process map in front of an on-disk store.
//!
//! Every remote fetch in the pipeline goes through this store. Writes go
//! through both tiers synchronously; a disk failure is logged and swallowed
//! (the cache is best-effort, not a durability guarantee). Expiry is checked
//! lazily at read time, plus an explicit `invalidate_expired` sweep.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ScoutError;

pub mod disk;
pub mod key;
pub mod memory;
pub mod stats;

pub use key::cache_key;
pub use stats::CacheStats;

use disk::DiskTier;
use memory::MemoryTier;

/// One cached payload with its expiry metadata. Also the on-disk file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    pub stored_at: DateTime<Utc>,
    pub ttl_secs: u64,
}

impl CacheEntry {
    pub fn new(payload: Value, ttl: Duration) -> Self {
        CacheEntry {
            payload,
            stored_at: Utc::now(),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// An entry is valid iff `now - stored_at < ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.stored_at);
        age.num_seconds() < 0 || age.num_seconds() as u64 >= self.ttl_secs
    }
}

/// The two-tier cache store. Shared across pipeline stages behind an `Arc`;
/// all methods take `&self` and synchronize internally.
pub struct CacheStore {
    memory: MemoryTier,
    disk: DiskTier,
    memory_hits: AtomicU64,
    memory_misses: AtomicU64,
    disk_hits: AtomicU64,
    disk_misses: AtomicU64,
}

impl CacheStore {
    /// Opens the store, creating the cache directory if needed. An unusable
    /// cache directory is a wiring failure and propagates.
    pub fn open(cache_dir: &Path, memory_capacity: usize) -> Result<Self, ScoutError> {
        Ok(CacheStore {
            memory: MemoryTier::new(memory_capacity),
            disk: DiskTier::open(cache_dir)?,
            memory_hits: AtomicU64::new(0),
            memory_misses: AtomicU64::new(0),
            disk_hits: AtomicU64::new(0),
            disk_misses: AtomicU64::new(0),
        })
    }

    /// Returns the cached payload for `key`, or `None` if absent or expired.
    /// A disk hit is promoted into the in-process tier. Returned payloads are
    /// copies; mutating them does not touch the cache.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.memory.get(key) {
            self.memory_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "cache hit (memory)");
            return Some(entry.payload);
        }
        self.memory_misses.fetch_add(1, Ordering::Relaxed);

        match self.disk.read(key) {
            Ok(Some(entry)) => {
                self.disk_hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache hit (disk), promoting to memory");
                self.memory.insert(key.to_string(), entry.clone());
                Some(entry.payload)
            }
            Ok(None) => {
                self.disk_misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                // Corrupt entries were already deleted by the disk tier.
                self.disk_misses.fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %e, "disk cache read failed, treating as miss");
                None
            }
        }
    }

    /// Write-through set. The in-process write always succeeds; a disk write
    /// failure is logged and non-fatal.
    pub fn set(&self, key: &str, payload: Value, ttl: Duration) {
        let entry = CacheEntry::new(payload, ttl);
        self.memory.insert(key.to_string(), entry.clone());
        if let Err(e) = self.disk.write(key, &entry) {
            warn!(key, error = %e, "disk cache write failed (entry kept in memory)");
        }
    }

    /// Scans both tiers and removes stale entries. Corrupt disk entries are
    /// removed as well.
    pub fn invalidate_expired(&self) {
        let removed_memory = self.memory.remove_expired();
        let removed_disk = self.disk.remove_expired();
        debug!(removed_memory, removed_disk, "expired cache entries purged");
    }

    /// Drops every entry in both tiers.
    pub fn clear(&self) -> Result<(), ScoutError> {
        self.memory.clear();
        self.disk.clear()?;
        Ok(())
    }

    /// Hit/miss counters split by tier plus the current in-process size.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            memory_misses: self.memory_misses.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            disk_misses: self.disk_misses.load(Ordering::Relaxed),
            memory_entries: self.memory.len(),
        }
    }
}
