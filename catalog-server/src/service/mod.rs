//! Product service - orchestration between transport and storage
//!
//! Validates input, calls the injected store and turns store failures into
//! the client-facing taxonomy in [`ServiceError`]. Update and delete check
//! existence first so a missing id is always reported as `NotFound` before
//! any write is attempted.

pub mod error;

use std::sync::Arc;

use crate::models::{NewProduct, Page, Product, ProductChanges, ProductCreate, ProductUpdate};
use crate::models::ValidationError;
use crate::store::{ConstraintKind, ProductStore, StoreError};

pub use error::{ServiceError, ServiceResult};

/// Column name reported when the store message names none
const UNKNOWN_FIELD: &str = "field";

/// Product operations over any [`ProductStore`]
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Fetch a product or fail with `NotFound`.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Product> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound { id })
    }

    /// One page of products, ordered by id.
    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list(page).await?)
    }

    pub async fn create(&self, input: ProductCreate) -> ServiceResult<Product> {
        let product = NewProduct::try_from(input)?;
        let name = product.name.as_str().to_owned();

        let created = self
            .store
            .create(product)
            .await
            .map_err(|e| classify(e, &name))?;

        tracing::info!(id = created.id, name = %created.name, "product created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, input: ProductUpdate) -> ServiceResult<Product> {
        let current = self.get_by_id(id).await?;
        let changes = ProductChanges::try_from(input)?;
        let name = changes.new_name().unwrap_or(&current.name).to_owned();

        let updated = self
            .store
            .update(id, changes)
            .await
            .map_err(|e| classify(e, &name))?
            // Deleted between the existence check and the write
            .ok_or(ServiceError::NotFound { id })?;

        tracing::info!(id, "product updated");
        Ok(updated)
    }

    /// Delete a product, returning what was stored.
    pub async fn delete(&self, id: i64) -> ServiceResult<Product> {
        self.get_by_id(id).await?;

        let removed = self
            .store
            .remove(id)
            .await?
            .ok_or(ServiceError::NotFound { id })?;

        tracing::info!(id, "product deleted");
        Ok(removed)
    }
}

/// Map a store failure on a write to the client-facing taxonomy.
fn classify(err: StoreError, name: &str) -> ServiceError {
    let StoreError::Constraint(violation) = err else {
        return ServiceError::Store(err);
    };

    match violation.kind {
        ConstraintKind::Unique => {
            tracing::warn!(name, "duplicate product name");
            ServiceError::AlreadyExists {
                name: name.to_owned(),
            }
        }
        ConstraintKind::NotNull => {
            let field = violation.column().unwrap_or(UNKNOWN_FIELD).to_owned();
            ValidationError::Null { field }.into()
        }
        ConstraintKind::Other => ServiceError::ConstraintViolation {
            message: violation.message,
        },
    }
}
