//! External cache layer for decoded configuration snapshots

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::models::ConfigValue;

/// Key/value cache for configuration snapshots, shared across processes.
///
/// Every failure mode is soft: a pool that cannot read or write behaves
/// like an empty cache and the store falls through to the database. The
/// database stays the system of record, so the worst outcome of a racing
/// writer is a miss forcing a reload.
pub trait CachePool: Send + Sync {
    /// Load a non-expired snapshot, or None on miss/expiry/error.
    fn load(&self, name: &str) -> Option<HashMap<String, ConfigValue>>;
    /// Store a snapshot with the given time-to-live.
    fn save(&self, name: &str, entries: &HashMap<String, ConfigValue>, ttl_secs: i64);
    /// Drop a snapshot if present.
    fn delete(&self, name: &str);
}

#[derive(Serialize, Deserialize)]
struct CachePayload {
    stored_at: DateTime<Utc>,
    ttl_secs: i64,
    entries: HashMap<String, ConfigValue>,
}

/// Filesystem-backed cache pool: one JSON file per cache name.
pub struct FilesystemCache {
    dir: PathBuf,
}

impl FilesystemCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl CachePool for FilesystemCache {
    fn load(&self, name: &str) -> Option<HashMap<String, ConfigValue>> {
        let raw = fs::read_to_string(self.entry_path(name)).ok()?;

        let payload: CachePayload = match serde_json::from_str(&raw) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Discarding unreadable cache entry '{}': {}", name, err);
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(payload.stored_at);
        if age > Duration::seconds(payload.ttl_secs) {
            log::debug!("Cache entry '{}' expired", name);
            return None;
        }

        Some(payload.entries)
    }

    fn save(&self, name: &str, entries: &HashMap<String, ConfigValue>, ttl_secs: i64) {
        let payload = CachePayload {
            stored_at: Utc::now(),
            ttl_secs,
            entries: entries.clone(),
        };

        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Failed to serialize cache entry '{}': {}", name, err);
                return;
            }
        };

        if let Err(err) =
            fs::create_dir_all(&self.dir).and_then(|_| fs::write(self.entry_path(name), json))
        {
            log::warn!("Failed to write cache entry '{}': {}", name, err);
        }
    }

    fn delete(&self, name: &str) {
        let path = self.entry_path(name);
        match fs::remove_file(&path) {
            Ok(_) => log::debug!("Deleted cache entry '{}'", name),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("Failed to delete cache entry '{}': {}", name, err),
        }
    }
}
