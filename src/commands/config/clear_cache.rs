use anyhow::Result;
use log::info;

use crate::config::Config;

/// Drop the in-memory snapshot and the filesystem cache entry
pub async fn clear_cache_command() -> Result<()> {
    info!("Clearing configuration cache");

    let config = Config::load().await?;
    config.clear_cache();

    println!("Configuration cache cleared");
    Ok(())
}
