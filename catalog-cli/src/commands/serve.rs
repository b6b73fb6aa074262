//! HTTP server command for the catalog API

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use catalog_server::db::{create_pool_with_options, schema};
use catalog_server::{build_store, run_server, AppState, StoreKind};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides CATALOG_BIND, default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Storage backend: orm or template (overrides CRUD_IMPL)
    #[arg(long)]
    pub crud_impl: Option<StoreKind>,

    /// Prefix for product routes (overrides API_V1_STR)
    #[arg(long)]
    pub api_prefix: Option<String>,

    /// Name shown by the root endpoint (overrides PROJECT_NAME)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Allowed CORS origin, repeatable (overrides BACKEND_CORS_ORIGINS)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut settings = args.database.settings()?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(kind) = args.crud_impl {
        settings.store_kind = kind;
    }
    if let Some(prefix) = args.api_prefix {
        settings.api_prefix = prefix;
    }
    if let Some(name) = args.project_name {
        settings.project_name = name;
    }
    if !args.cors_origins.is_empty() {
        settings.cors_origins = args.cors_origins;
    }
    let settings = settings.validate().context("Invalid configuration")?;

    // Create database pool
    let pool = create_pool_with_options(&settings.database_url, settings.max_connections)
        .await
        .context("Failed to create database pool")?;

    schema::init(&pool)
        .await
        .context("Failed to create tables")?;

    let store = build_store(settings.store_kind, pool);

    // Run server (blocks until shutdown)
    run_server(AppState::new(store, settings))
        .await
        .context("Server error")?;

    Ok(())
}
