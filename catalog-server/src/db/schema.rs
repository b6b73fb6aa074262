//! Table bootstrap for the product catalog
//!
//! `init` is idempotent and safe to run on every start.

use sqlx::SqlitePool;

/// Name of the only table the catalog owns
pub const PRODUCTS_TABLE: &str = "products";

/// Create the products table and its index if missing.
pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring catalog schema...");

    // AUTOINCREMENT keeps ids from being reused after deletes
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        VARCHAR(100) NOT NULL UNIQUE,
            description VARCHAR(255),
            price       REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_products_name ON products (name)")
        .execute(pool)
        .await?;

    tracing::info!("Catalog schema ready");
    Ok(())
}

/// Check that every table the catalog needs is present.
pub async fn verify(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(PRODUCTS_TABLE)
            .fetch_optional(pool)
            .await?;

    if found.is_none() {
        tracing::warn!(table = PRODUCTS_TABLE, "missing table");
    }
    Ok(found.is_some())
}
