//! Cache observability snapshot.

use serde::Serialize;

/// Point-in-time hit/miss counters, split by tier.
///
/// A disk hit is counted together with a memory miss for the same lookup;
/// the overall hit rate counts a lookup as a hit if either tier served it.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub memory_hits: u64,
    pub memory_misses: u64,
    pub disk_hits: u64,
    pub disk_misses: u64,
    pub memory_entries: usize,
}

impl CacheStats {
    pub fn total_hits(&self) -> u64 {
        self.memory_hits + self.disk_hits
    }

    /// Overall hit rate in [0, 1]. Total lookups = memory hits + memory
    /// misses, since every lookup touches the memory tier first.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.memory_hits + self.memory_misses;
        if lookups == 0 {
            0.0
        } else {
            self.total_hits() as f64 / lookups as f64
        }
    }
}
