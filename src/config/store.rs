//! Read-through cached access to configuration values

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use log::debug;
use sqlx::SqlitePool;

use super::cache::CachePool;
use super::defaults::DEFAULT_ENTRIES;
use super::models::{ConfigValue, DataType};
use super::repository::configuration as repository;

/// Entry name used with the external cache pool
const CACHE_NAME: &str = "shop_configuration";
/// External cache expiry; writes invalidate eagerly rather than waiting
const CACHE_TTL_SECS: i64 = 3600;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;
type ValueMap = HashMap<String, ConfigValue>;

/// Cached key/value access to the `configuration` table.
///
/// Reads go through a lazily loaded full-table snapshot (one query, not one
/// per key); writes go straight to the database and invalidate the snapshot.
/// An optional external cache pool shares the snapshot across processes.
pub struct ConfigStore {
    pool: SqlitePool,
    cache: RwLock<Option<Arc<ValueMap>>>,
    cache_pool: Option<Box<dyn CachePool>>,
    env_lookup: EnvLookup,
}

impl ConfigStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: RwLock::new(None),
            cache_pool: None,
            env_lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Attach an external cache pool shared across processes
    pub fn with_cache_pool(mut self, cache_pool: Box<dyn CachePool>) -> Self {
        self.cache_pool = Some(cache_pool);
        self
    }

    /// Override the environment lookup (stubbed in tests)
    pub fn with_env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Get the decoded value for a key. Absent keys are `None`, never an
    /// error; only a failing database load surfaces as `Err`.
    pub async fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        let cache = self.loaded_cache().await?;
        Ok(cache.get(key).cloned())
    }

    /// Get the decoded value for a key, or `default` if unset
    pub async fn get_or(&self, key: &str, default: ConfigValue) -> Result<ConfigValue> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Persist a value under a key and invalidate the cache.
    ///
    /// An existing entry keeps its declared data type, metadata and
    /// `created_at`; the tag and metadata only apply on first insert.
    pub async fn set(
        &self,
        key: &str,
        value: &ConfigValue,
        data_type: DataType,
        description: Option<&str>,
        category: Option<&str>,
    ) -> Result<()> {
        let effective_type = match repository::find_by_key(&self.pool, key).await? {
            Some(existing) => DataType::from_tag(&existing.data_type),
            None => data_type,
        };

        let raw = value.to_raw(effective_type);
        repository::upsert(
            &self.pool,
            key,
            Some(&raw),
            data_type.as_str(),
            description,
            category,
        )
        .await?;

        self.clear_cache();
        Ok(())
    }

    /// Full decoded snapshot of all configuration values
    pub async fn get_all(&self) -> Result<ValueMap> {
        let cache = self.loaded_cache().await?;
        Ok((*cache).clone())
    }

    /// Values in one category, straight from the database (bypasses cache)
    pub async fn get_by_category(&self, category: &str) -> Result<ValueMap> {
        let rows = repository::by_category(&self.pool, category).await?;
        Ok(decode_rows(rows))
    }

    /// Values flagged public, straight from the database (bypasses cache)
    pub async fn get_public(&self) -> Result<ValueMap> {
        let rows = repository::public_entries(&self.pool).await?;
        Ok(decode_rows(rows))
    }

    /// Whether a key has a value set
    pub async fn has(&self, key: &str) -> Result<bool> {
        let cache = self.loaded_cache().await?;
        Ok(cache.contains_key(key))
    }

    /// Drop the in-memory snapshot and the external cache entry; the next
    /// read reloads from the database
    pub fn clear_cache(&self) {
        *self.cache.write().unwrap() = None;
        if let Some(cache_pool) = &self.cache_pool {
            cache_pool.delete(CACHE_NAME);
        }
    }

    /// Stored value if present, else a non-empty environment variable.
    ///
    /// An environment value is auto-imported: persisted as a string entry
    /// whose description records the source variable, so subsequent reads no
    /// longer consult the environment. Falls back to `default` when neither
    /// source has a value.
    pub async fn get_with_env_fallback(
        &self,
        key: &str,
        env_var: &str,
        default: Option<ConfigValue>,
    ) -> Result<Option<ConfigValue>> {
        if let Some(value) = self.get(key).await? {
            return Ok(Some(value));
        }

        if let Some(env_value) = (self.env_lookup)(env_var) {
            if !env_value.is_empty() {
                debug!("Auto-importing '{}' from environment variable {}", key, env_var);
                let description = format!("Auto-imported from environment variable: {}", env_var);
                self.set(
                    key,
                    &ConfigValue::String(env_value.clone()),
                    DataType::String,
                    Some(&description),
                    None,
                )
                .await?;
                return Ok(Some(ConfigValue::String(env_value)));
            }
        }

        Ok(default)
    }

    /// Seed the default entries, skipping keys that already have a value.
    /// Idempotent; returns the number of entries written.
    pub async fn initialize_defaults(&self) -> Result<usize> {
        let mut seeded = 0;

        for entry in DEFAULT_ENTRIES.iter() {
            if !self.has(entry.key).await? {
                self.set(
                    entry.key,
                    &entry.value,
                    entry.data_type,
                    Some(entry.description),
                    Some(entry.category),
                )
                .await?;
                seeded += 1;
            }
        }

        Ok(seeded)
    }

    // Typed getters

    pub async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).await?.and_then(|v| v.as_str().map(str::to_string)))
    }

    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.get(key).await?.and_then(|v| v.as_int()))
    }

    pub async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.get(key).await?.and_then(|v| v.as_bool()))
    }

    // Shop helpers with the documented fallbacks

    pub async fn shop_name(&self) -> Result<String> {
        Ok(self.get_string("shop.name").await?.unwrap_or_else(|| "My Shop".to_string()))
    }

    pub async fn shop_description(&self) -> Result<String> {
        Ok(self
            .get_string("shop.description")
            .await?
            .unwrap_or_else(|| "Your trusted online shopping destination".to_string()))
    }

    pub async fn shop_email(&self) -> Result<String> {
        Ok(self
            .get_string("shop.email")
            .await?
            .unwrap_or_else(|| "info@example.com".to_string()))
    }

    pub async fn shop_phone(&self) -> Result<String> {
        Ok(self.get_string("shop.phone").await?.unwrap_or_else(|| "+1-555-0123".to_string()))
    }

    pub async fn currency(&self) -> Result<String> {
        Ok(self.get_string("shop.currency").await?.unwrap_or_else(|| "USD".to_string()))
    }

    pub async fn currency_symbol(&self) -> Result<String> {
        Ok(self.get_string("shop.currency_symbol").await?.unwrap_or_else(|| "$".to_string()))
    }

    /// Return the loaded snapshot, filling it from the external cache pool
    /// or the database on first use. Two tasks racing the first load both
    /// read the same table; last write wins, which is harmless.
    async fn loaded_cache(&self) -> Result<Arc<ValueMap>> {
        if let Some(map) = self.cache.read().unwrap().as_ref() {
            return Ok(Arc::clone(map));
        }

        if let Some(cache_pool) = &self.cache_pool {
            if let Some(entries) = cache_pool.load(CACHE_NAME) {
                debug!("Loaded {} configuration values from cache pool", entries.len());
                let map = Arc::new(entries);
                *self.cache.write().unwrap() = Some(Arc::clone(&map));
                return Ok(map);
            }
        }

        let rows = repository::all(&self.pool).await?;
        let map = Arc::new(decode_rows(rows));
        debug!("Loaded {} configuration values from database", map.len());

        if let Some(cache_pool) = &self.cache_pool {
            cache_pool.save(CACHE_NAME, &map, CACHE_TTL_SECS);
        }

        *self.cache.write().unwrap() = Some(Arc::clone(&map));
        Ok(map)
    }
}

/// Decode rows into a key/value map. Rows with a NULL value carry no typed
/// value and are skipped.
fn decode_rows(rows: Vec<super::models::DbConfiguration>) -> ValueMap {
    let mut map = HashMap::new();
    for row in rows {
        if let Some(value) = row.typed_value() {
            map.insert(row.key, value);
        }
    }
    map
}
