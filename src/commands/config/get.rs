use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::Config;

/// Print the decoded value for a configuration key
///
/// # Arguments
/// * `key` - Configuration key
/// * `env_var` - Optional environment variable to fall back to; a non-empty
///   value is auto-imported into the store on first use
pub async fn get_command(key: String, env_var: Option<String>) -> Result<()> {
    info!("Getting configuration value: {}", key);

    let config = Config::load().await?;

    let value = match env_var {
        Some(var) => config.store.get_with_env_fallback(&key, &var, None).await?,
        None => config.get(&key).await?,
    };

    match value {
        Some(value) => println!("{}", value),
        None => println!("{}", format!("No value set for '{}'", key).yellow()),
    }

    Ok(())
}
