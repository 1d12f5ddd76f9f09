//! Repository for configuration entries

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::models::DbConfiguration;

/// Load a single entry by key
pub async fn find_by_key(pool: &SqlitePool, key: &str) -> Result<Option<DbConfiguration>> {
    sqlx::query_as::<_, DbConfiguration>("SELECT * FROM configuration WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to load configuration entry '{}'", key))
}

/// Load every entry, ordered by key
pub async fn all(pool: &SqlitePool) -> Result<Vec<DbConfiguration>> {
    sqlx::query_as::<_, DbConfiguration>("SELECT * FROM configuration ORDER BY key")
        .fetch_all(pool)
        .await
        .context("Failed to load configuration entries")
}

/// Load entries in a category, ordered by key
pub async fn by_category(pool: &SqlitePool, category: &str) -> Result<Vec<DbConfiguration>> {
    sqlx::query_as::<_, DbConfiguration>(
        "SELECT * FROM configuration WHERE category = ? ORDER BY key",
    )
    .bind(category)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to load configuration entries for category '{}'", category))
}

/// Load entries flagged public, ordered by key
pub async fn public_entries(pool: &SqlitePool) -> Result<Vec<DbConfiguration>> {
    sqlx::query_as::<_, DbConfiguration>(
        "SELECT * FROM configuration WHERE is_public = 1 ORDER BY key",
    )
    .fetch_all(pool)
    .await
    .context("Failed to load public configuration entries")
}

/// Insert or update an entry by key.
///
/// On conflict only the value and `updated_at` change; the data type,
/// metadata and `created_at` of an existing row are preserved.
pub async fn upsert(
    pool: &SqlitePool,
    key: &str,
    value: Option<&str>,
    data_type: &str,
    description: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO configuration (key, value, data_type, description, category)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .bind(data_type)
    .bind(description)
    .bind(category)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to upsert configuration entry '{}'", key))?;

    log::debug!("Upserted configuration entry: {}", key);
    Ok(())
}

/// Flip the public flag on an entry
pub async fn set_public(pool: &SqlitePool, key: &str, is_public: bool) -> Result<()> {
    let result = sqlx::query(
        "UPDATE configuration SET is_public = ?, updated_at = CURRENT_TIMESTAMP WHERE key = ?",
    )
    .bind(is_public)
    .bind(key)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to update public flag for '{}'", key))?;

    if result.rows_affected() == 0 {
        anyhow::bail!("Configuration entry '{}' not found", key);
    }

    Ok(())
}
