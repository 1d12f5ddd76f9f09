//! Versioned migration framework for the configuration database

use anyhow::{Context, Result};
use log::{debug, info, warn};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};

/// A single migration with up and down SQL
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub down_sql: String,
}

/// Migration status in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// Direction for migration operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Load all available migrations from the embedded files
pub fn load_migrations() -> BTreeMap<i64, Migration> {
    let mut migrations = BTreeMap::new();

    migrations.insert(1, Migration {
        version: 1,
        name: "initial".to_string(),
        up_sql: include_str!("files/001_initial/up.sql").to_string(),
        down_sql: include_str!("files/001_initial/down.sql").to_string(),
    });

    migrations.insert(2, Migration {
        version: 2,
        name: "indexes".to_string(),
        up_sql: include_str!("files/002_indexes/up.sql").to_string(),
        down_sql: include_str!("files/002_indexes/down.sql").to_string(),
    });

    migrations
}

/// Calculate checksum for migration SQL
pub fn calculate_checksum(sql: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    sql.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

async fn init_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

/// Get list of applied migrations
pub async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, name, applied_at, checksum FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .context("Failed to get applied migrations")
}

/// Get the current schema version (highest applied migration)
pub async fn get_current_version(pool: &SqlitePool) -> Result<Option<i64>> {
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to get current schema version")?;

    Ok(version)
}

/// Migration manager handles running migrations up and down
pub struct MigrationManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MigrationManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations
    pub async fn migrate_up(&self) -> Result<()> {
        init_migration_table(self.pool).await?;
        self.validate().await?;

        let available = load_migrations();
        let applied: HashSet<i64> = get_applied_migrations(self.pool)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let pending: Vec<&Migration> = available
            .values()
            .filter(|m| !applied.contains(&m.version))
            .collect();

        if pending.is_empty() {
            debug!("No pending migrations");
            return Ok(());
        }

        info!("Running {} pending migrations", pending.len());
        for migration in pending {
            self.apply(migration, Direction::Up).await?;
        }

        Ok(())
    }

    /// Rollback to a specific version (or all the way down if None)
    pub async fn migrate_down(&self, target_version: Option<i64>) -> Result<()> {
        init_migration_table(self.pool).await?;
        self.validate().await?;

        let available = load_migrations();
        let applied = get_applied_migrations(self.pool).await?;
        let target = target_version.unwrap_or(0);

        let mut to_rollback = Vec::new();
        for applied_migration in applied.into_iter().rev() {
            if applied_migration.version > target {
                let migration = available.get(&applied_migration.version).with_context(|| {
                    format!(
                        "Cannot rollback migration {} - migration file not found",
                        applied_migration.version
                    )
                })?;
                to_rollback.push(migration.clone());
            }
        }

        if to_rollback.is_empty() {
            debug!("Already at or below target version {}", target);
            return Ok(());
        }

        info!("Rolling back {} migrations to version {}", to_rollback.len(), target);
        for migration in to_rollback {
            self.apply(&migration, Direction::Down).await?;
        }

        Ok(())
    }

    /// Check that applied migrations match the embedded ones
    async fn validate(&self) -> Result<()> {
        let available = load_migrations();

        for applied in get_applied_migrations(self.pool).await? {
            let migration = available.get(&applied.version).with_context(|| {
                format!(
                    "Applied migration {} '{}' not found in available migrations",
                    applied.version, applied.name
                )
            })?;

            let expected = calculate_checksum(&migration.up_sql);
            if applied.checksum != expected {
                anyhow::bail!(
                    "Migration {} checksum mismatch (applied: {}, expected: {}). \
                    The migration file was modified after being applied.",
                    applied.version,
                    applied.checksum,
                    expected
                );
            }
        }

        Ok(())
    }

    async fn apply(&self, migration: &Migration, direction: Direction) -> Result<()> {
        let sql = match direction {
            Direction::Up => &migration.up_sql,
            Direction::Down => &migration.down_sql,
        };

        if sql.trim().is_empty() {
            warn!("Migration {} has empty SQL for {:?}, skipping", migration.version, direction);
            return Ok(());
        }

        info!(
            "{} migration {} '{}'",
            match direction {
                Direction::Up => "Applying",
                Direction::Down => "Rolling back",
            },
            migration.version,
            migration.name
        );

        // Statements are separated by semicolons; sqlite executes one at a time
        for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement)
                .execute(self.pool)
                .await
                .with_context(|| {
                    format!("Failed to execute migration {} statement", migration.version)
                })?;
        }

        match direction {
            Direction::Up => {
                sqlx::query(
                    "INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)",
                )
                .bind(migration.version)
                .bind(&migration.name)
                .bind(calculate_checksum(&migration.up_sql))
                .execute(self.pool)
                .await
                .context("Failed to record applied migration")?;
            }
            Direction::Down => {
                sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
                    .bind(migration.version)
                    .execute(self.pool)
                    .await
                    .context("Failed to remove rolled back migration")?;
            }
        }

        Ok(())
    }
}
