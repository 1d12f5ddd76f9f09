//! SQLite-based configuration store
//!
//! Persistent storage for shop settings: typed key/value entries served
//! through a read-through cache with explicit invalidation on write.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod cache;
pub mod db;
pub mod defaults;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod store;

pub use models::{ConfigValue, DataType, DbConfiguration};
pub use store::ConfigStore;

/// Main configuration manager using SQLite backend
pub struct Config {
    pub(crate) pool: sqlx::SqlitePool,
    config_path: PathBuf,

    /// Cached typed access to configuration values
    pub store: ConfigStore,
}

impl Config {
    /// Get the path to the SQLite database file
    pub fn get_db_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("shop-config")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".shop-config")
        };

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            log::info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.db"))
    }

    /// Get the directory used by the filesystem cache pool
    pub fn get_cache_dir() -> Result<PathBuf> {
        let cache_dir = if cfg!(target_os = "linux") {
            dirs::cache_dir()
                .context("Failed to get XDG cache directory")?
                .join("shop-config")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".shop-config")
                .join("cache")
        };

        Ok(cache_dir)
    }

    /// Load configuration from the SQLite database, running any pending
    /// migrations first
    pub async fn load() -> Result<Self> {
        let db_path = Self::get_db_path()?;
        log::debug!("Loading config from: {:?}", db_path);

        let pool = db::connect(&db_path).await?;
        db::run_migrations(&pool).await?;

        let cache_pool = cache::FilesystemCache::new(Self::get_cache_dir()?);
        let store = ConfigStore::new(pool.clone()).with_cache_pool(Box::new(cache_pool));

        Ok(Self {
            pool,
            config_path: db_path,
            store,
        })
    }

    /// Create a new config for testing (in-memory database, no external
    /// cache pool)
    pub async fn new_test() -> Result<Self> {
        let pool = db::connect_memory().await?;
        db::run_migrations(&pool).await?;

        let store = ConfigStore::new(pool.clone());

        Ok(Self {
            pool,
            config_path: PathBuf::from(":memory:"),
            store,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Access the underlying pool, for callers that need the repository
    /// layer directly
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    // Store delegation methods

    pub async fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.store.get(key).await
    }

    pub async fn set(
        &self,
        key: &str,
        value: &ConfigValue,
        data_type: DataType,
        description: Option<&str>,
        category: Option<&str>,
    ) -> Result<()> {
        self.store.set(key, value, data_type, description, category).await
    }

    pub async fn get_all(&self) -> Result<HashMap<String, ConfigValue>> {
        self.store.get_all().await
    }

    pub async fn has(&self, key: &str) -> Result<bool> {
        self.store.has(key).await
    }

    pub fn clear_cache(&self) {
        self.store.clear_cache();
    }

    pub async fn initialize_defaults(&self) -> Result<usize> {
        self.store.initialize_defaults().await
    }
}
