//! ORM backend - products through sea-orm
//!
//! Reads go through the entity finders. Partial updates use `update_many`
//! with one column expression per provided field, so an explicit null
//! reaches the database and trips its NOT NULL constraint instead of being
//! swallowed by the typed model.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlxSqliteConnector, TransactionTrait,
};
use sqlx::SqlitePool;

use super::entity::{self, Column, Entity};
use super::{ProductStore, StoreKind, StoreResult};
use crate::models::{NewProduct, Page, Product, ProductChanges, ProductName};

/// sea-orm product store
#[derive(Clone)]
pub struct OrmProductStore {
    db: DatabaseConnection,
}

impl OrmProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Wrap an existing sqlx pool so both backends share connections.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }
}

#[async_trait]
impl ProductStore for OrmProductStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Orm
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Product>> {
        let model = Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>> {
        let model = Entity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(Product::from))
    }

    async fn list(&self, page: Page) -> StoreResult<Vec<Product>> {
        let models = Entity::find()
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let txn = self.db.begin().await?;

        let model = entity::ActiveModel {
            name: Set(product.name.into_string()),
            description: Set(product.description),
            price: Set(product.price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::debug!(id = model.id, "orm: product inserted");
        Ok(model.into())
    }

    async fn update(&self, id: i64, changes: ProductChanges) -> StoreResult<Option<Product>> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        // Dropping the transaction on any error path rolls it back
        let txn = self.db.begin().await?;

        let mut update = Entity::update_many().filter(Column::Id.eq(id));
        if let Some(name) = changes.name {
            update = update.col_expr(
                Column::Name,
                Expr::value(name.map(ProductName::into_string)),
            );
        }
        if let Some(description) = changes.description {
            update = update.col_expr(Column::Description, Expr::value(description));
        }
        if let Some(price) = changes.price {
            update = update.col_expr(Column::Price, Expr::value(price));
        }

        let result = update.exec(&txn).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;
        Ok(model.map(Product::from))
    }

    async fn remove(&self, id: i64) -> StoreResult<Option<Product>> {
        // DELETE ... RETURNING: no read lock held before the write
        let removed = Entity::delete_many()
            .filter(Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?;

        Ok(removed.into_iter().next().map(Product::from))
    }
}
