//! Database bootstrap command
//!
//! Creates the products table (idempotent) and checks it exists afterwards.

use anyhow::{bail, Context, Result};
use clap::Parser;

use catalog_server::db::{create_pool_with_options, schema};

use super::DatabaseArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create and verify the catalog schema
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let settings = args
        .database
        .settings()?
        .validate()
        .context("Invalid configuration")?;

    tracing::info!("Initializing database at {}", settings.database_url);

    let pool = create_pool_with_options(&settings.database_url, settings.max_connections)
        .await
        .context("Failed to create database pool")?;

    schema::init(&pool)
        .await
        .context("Failed to create tables")?;

    let ok = schema::verify(&pool)
        .await
        .context("Failed to verify tables")?;
    if !ok {
        bail!("Database initialization failed: not all tables were created");
    }

    println!("Database initialized: {}", settings.database_url);
    Ok(())
}
