//! Raw SQL backend - products through hand-written statements
//!
//! Kept for benchmarking against the ORM path. Every value is bound as a
//! parameter; the only SQL text assembled at runtime is the `SET` list,
//! whose column names come from the fixed set below.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{ProductStore, StoreKind, StoreResult};
use crate::models::{NewProduct, Page, Product, ProductChanges, ProductName};

/// Raw SQL product store
#[derive(Clone)]
pub struct SqlProductStore {
    pool: SqlitePool,
}

impl SqlProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for SqlProductStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Template
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price FROM products WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price
            FROM products
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price)
            VALUES (?, ?, ?)
            RETURNING id, name, description, price
            "#,
        )
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(id = created.id, "template: product inserted");
        Ok(created)
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> StoreResult<Option<Product>> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        // Dropping the transaction on any error path rolls it back
        let mut tx = self.pool.begin().await?;

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE products SET ");
        {
            let mut set = query.separated(", ");
            if let Some(name) = changes.name {
                set.push("name = ")
                    .push_bind_unseparated(name.map(ProductName::into_string));
            }
            if let Some(description) = changes.description {
                set.push("description = ").push_bind_unseparated(description);
            }
            if let Some(price) = changes.price {
                set.push("price = ").push_bind_unseparated(price);
            }
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query.build().execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn remove(&self, id: i64) -> StoreResult<Option<Product>> {
        // Single statement so the write lock is taken up front
        let removed = sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = ?
            RETURNING id, name, description, price
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(removed)
    }
}
