//! On-disk cache tier — one JSON file per key under the cache directory.
//!
//! Each file serializes a full `CacheEntry` (payload + stored_at + ttl).
//! A file that fails to parse is deleted and reported as corruption; the
//! store above treats that as a miss.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use super::CacheEntry;
use crate::errors::ScoutError;

pub struct DiskTier {
    dir: PathBuf,
}

impl DiskTier {
    pub fn open(dir: &Path) -> Result<Self, ScoutError> {
        fs::create_dir_all(dir)?;
        Ok(DiskTier { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads an entry. `Ok(None)` for absent or expired (expired files are
    /// removed); `Err(CacheCorruption)` for an unparsable file, which is
    /// deleted so the next run starts clean.
    pub fn read(&self, key: &str) -> Result<Option<CacheEntry>, ScoutError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => {
                warn!(key, path = %path.display(), "deleting corrupt cache file");
                let _ = fs::remove_file(&path);
                return Err(ScoutError::CacheCorruption { key: key.to_string() });
            }
        };

        if entry.is_expired(Utc::now()) {
            let _ = fs::remove_file(&path);
            return Ok(None);
        }
        Ok(Some(entry))
    }

    pub fn write(&self, key: &str, entry: &CacheEntry) -> Result<(), ScoutError> {
        let serialized = serde_json::to_string(entry)?;
        fs::write(self.path_for(key), serialized)?;
        Ok(())
    }

    /// Scans the directory, removing expired and corrupt files. Returns how
    /// many files were removed.
    pub fn remove_expired(&self) -> usize {
        let now = Utc::now();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "cache directory scan failed");
                return 0;
            }
        };

        let mut removed = 0;
        for dir_entry in entries.flatten() {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let stale = match fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => entry.is_expired(now),
                    Err(_) => true, // corrupt
                },
                Err(_) => true,
            };
            if stale && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    pub fn clear(&self) -> Result<(), ScoutError> {
        for dir_entry in fs::read_dir(&self.dir)?.flatten() {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
