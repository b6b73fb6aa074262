//! Product storage - one contract, two backends
//!
//! - [`OrmProductStore`]: sea-orm entity and query builder
//! - [`SqlProductStore`]: parameterized SQL text through sqlx
//!
//! Both must be indistinguishable from the service's point of view.
//! The backend is picked once at startup via [`StoreKind`].

pub mod entity;
pub mod orm;
pub mod sql;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DbErr, RuntimeErr};
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;

use crate::models::{NewProduct, Page, Product, ProductChanges};

pub use orm::OrmProductStore;
pub use sql::SqlProductStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage contract shared by both backends.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> StoreKind;

    /// Fetch one product. Missing rows are `Ok(None)`, not an error.
    async fn get(&self, id: i64) -> StoreResult<Option<Product>>;

    /// Fetch a product by its exact (case-sensitive) name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Product>>;

    /// Products ordered by id ascending within the page window.
    async fn list(&self, page: Page) -> StoreResult<Vec<Product>>;

    /// Insert a product. The store assigns the id.
    async fn create(&self, product: NewProduct) -> StoreResult<Product>;

    /// Apply only the provided fields.
    ///
    /// Returns `Ok(None)` when no row has this id. An empty change set
    /// returns the current record untouched.
    async fn update(&self, id: i64, changes: ProductChanges) -> StoreResult<Option<Product>>;

    /// Delete a product, returning what was stored.
    async fn remove(&self, id: i64) -> StoreResult<Option<Product>>;
}

/// Storage backend selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// sea-orm entity mapping
    #[default]
    Orm,
    /// Raw templated SQL
    Template,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orm => "orm",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown backend name
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown storage backend '{0}' (expected 'orm' or 'template')")]
pub struct UnknownStoreKind(pub String);

impl FromStr for StoreKind {
    type Err = UnknownStoreKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orm" => Ok(Self::Orm),
            "template" => Ok(Self::Template),
            _ => Err(UnknownStoreKind(s.to_owned())),
        }
    }
}

/// Build the configured backend over a shared pool.
pub fn build_store(kind: StoreKind, pool: SqlitePool) -> Arc<dyn ProductStore> {
    tracing::info!(backend = %kind, "using {} storage backend", kind);
    match kind {
        StoreKind::Orm => Arc::new(OrmProductStore::from_pool(pool)),
        StoreKind::Template => Arc::new(SqlProductStore::new(pool)),
    }
}

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("constraint violation: {}", .0.message)]
    Constraint(ConstraintViolation),

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("orm error: {0}")]
    Orm(DbErr),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match ConstraintViolation::from_sqlx(&e) {
            Some(violation) => Self::Constraint(violation),
            None => Self::Sqlx(e),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(e: DbErr) -> Self {
        let violation = match &e {
            DbErr::Exec(RuntimeErr::SqlxError(inner))
            | DbErr::Query(RuntimeErr::SqlxError(inner)) => ConstraintViolation::from_sqlx(inner),
            other => ConstraintViolation::from_message(&other.to_string()),
        };

        match violation {
            Some(violation) => Self::Constraint(violation),
            None => Self::Orm(e),
        }
    }
}

/// Which constraint a write tripped over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    NotNull,
    Other,
}

/// Constraint failure reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub message: String,
}

/// `products.<column>` as SQLite prints it in constraint messages
static QUALIFIED_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bproducts\.([A-Za-z0-9_]+)").expect("invalid column regex")
});

impl ConstraintViolation {
    /// Classify a driver error.
    ///
    /// Uses the driver's structured error kind first and falls back to the
    /// message text when the kind is not reported.
    pub fn from_sqlx(err: &sqlx::Error) -> Option<Self> {
        let db = err.as_database_error()?;
        let kind = match db.kind() {
            ErrorKind::UniqueViolation => ConstraintKind::Unique,
            ErrorKind::NotNullViolation => ConstraintKind::NotNull,
            ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation => ConstraintKind::Other,
            _ => return Self::from_message(db.message()),
        };

        Some(Self {
            kind,
            message: db.message().to_owned(),
        })
    }

    /// Classify from message text alone.
    pub fn from_message(message: &str) -> Option<Self> {
        let kind = if message.contains("UNIQUE constraint failed")
            || message.to_lowercase().contains("already exists")
        {
            ConstraintKind::Unique
        } else if message.contains("NOT NULL constraint failed") {
            ConstraintKind::NotNull
        } else if message.contains("constraint failed") {
            ConstraintKind::Other
        } else {
            return None;
        };

        Some(Self {
            kind,
            message: message.to_owned(),
        })
    }

    /// Column named in the message, e.g. `name` for
    /// `NOT NULL constraint failed: products.name`.
    ///
    /// SQLite-specific: other engines word these messages differently.
    pub fn column(&self) -> Option<&str> {
        QUALIFIED_COLUMN
            .captures(&self.message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_kind() {
        assert_eq!("orm".parse::<StoreKind>().unwrap(), StoreKind::Orm);
        assert_eq!("TEMPLATE".parse::<StoreKind>().unwrap(), StoreKind::Template);
        assert!("mongo".parse::<StoreKind>().is_err());
        assert_eq!(StoreKind::default(), StoreKind::Orm);
    }

    #[test]
    fn classifies_messages() {
        let v = ConstraintViolation::from_message("UNIQUE constraint failed: products.name")
            .unwrap();
        assert_eq!(v.kind, ConstraintKind::Unique);

        let v = ConstraintViolation::from_message("NOT NULL constraint failed: products.price")
            .unwrap();
        assert_eq!(v.kind, ConstraintKind::NotNull);
        assert_eq!(v.column(), Some("price"));

        let v = ConstraintViolation::from_message("CHECK constraint failed: price_positive")
            .unwrap();
        assert_eq!(v.kind, ConstraintKind::Other);

        assert!(ConstraintViolation::from_message("disk I/O error").is_none());
    }

    #[test]
    fn column_requires_table_qualifier() {
        let v = ConstraintViolation {
            kind: ConstraintKind::NotNull,
            message: "NOT NULL constraint failed: name".into(),
        };
        assert_eq!(v.column(), None);

        let v = ConstraintViolation {
            kind: ConstraintKind::NotNull,
            message: "NOT NULL constraint failed: products.description_long (x)".into(),
        };
        assert_eq!(v.column(), Some("description_long"));
    }
}
