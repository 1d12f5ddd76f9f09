use anyhow::Result;
use clap::Parser;
use log::info;

use shop_config::cli::{Cli, Commands};
use shop_config::commands::config::{
    clear_cache_command, get_command, init_command, list_command, set_command,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting shop-config");

    match cli.command {
        Commands::Init => init_command().await,
        Commands::Get { key, env_var } => get_command(key, env_var).await,
        Commands::Set {
            key,
            value,
            data_type,
            description,
            category,
        } => set_command(key, value, data_type, description, category).await,
        Commands::List { category, public } => list_command(category, public).await,
        Commands::ClearCache => clear_cache_command().await,
    }
}
