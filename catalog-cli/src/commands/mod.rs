//! Command implementations for the catalog CLI

pub mod init_db;
pub mod serve;

use anyhow::{Context, Result};
use catalog_server::Settings;
use clap::Args;

pub use init_db::run_init_db;
pub use serve::run_serve;

/// Database selection shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides DATABASE_URL / .env)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum pooled connections (overrides DATABASE_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,
}

impl DatabaseArgs {
    /// Load settings from the environment, then apply these flags on top.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::from_env().context("Invalid environment configuration")?;

        if let Some(url) = &self.database_url {
            settings.database_url = url.clone();
        }
        if let Some(max) = self.max_connections {
            settings.max_connections = max;
        }

        Ok(settings)
    }
}
