use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::defaults::DEFAULT_ENTRIES;
use crate::config::Config;

/// Run migrations and seed the default configuration values.
///
/// Idempotent: keys that already have a value are left untouched, so a
/// customized shop keeps its settings.
pub async fn init_command() -> Result<()> {
    info!("Initializing configuration defaults");

    // load() runs pending migrations before we touch the table
    let config = Config::load().await?;
    let seeded = config.initialize_defaults().await?;
    let existing = DEFAULT_ENTRIES.len() - seeded;

    println!(
        "{} Seeded {} default values ({} already present)",
        "✓".green(),
        seeded,
        existing
    );

    Ok(())
}
