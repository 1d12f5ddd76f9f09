use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::Config;

/// List configuration values, optionally filtered by category or public flag
pub async fn list_command(category: Option<String>, public: bool) -> Result<()> {
    info!("Listing configuration values");

    let config = Config::load().await?;

    let values = if let Some(category) = &category {
        config.store.get_by_category(category).await?
    } else if public {
        config.store.get_public().await?
    } else {
        config.get_all().await?
    };

    if values.is_empty() {
        println!("No configuration values found");
        return Ok(());
    }

    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();

    for key in keys {
        println!("{} = {}", key.cyan(), values[key]);
    }

    Ok(())
}
