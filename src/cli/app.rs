use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shop-config")]
#[command(about = "Manage shop configuration values stored in SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations and seed the default configuration values
    Init,
    /// Print the decoded value for a configuration key
    Get {
        /// Configuration key, e.g. "shop.name"
        key: String,
        /// Environment variable to fall back to (auto-imported on first use)
        #[arg(long)]
        env_var: Option<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value, validated against the data type
        value: String,
        /// Data type: string, integer, boolean, json or text
        #[arg(long = "type", default_value = "string")]
        data_type: String,
        /// Human-readable description (only applied on first insert)
        #[arg(long)]
        description: Option<String>,
        /// Category grouping (only applied on first insert)
        #[arg(long)]
        category: Option<String>,
    },
    /// List configuration values
    List {
        /// Only entries in this category
        #[arg(long)]
        category: Option<String>,
        /// Only entries flagged public
        #[arg(long)]
        public: bool,
    },
    /// Drop the in-memory and filesystem configuration caches
    ClearCache,
}
