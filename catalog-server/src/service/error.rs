//! Error taxonomy surfaced by the product service

use thiserror::Error;

use crate::models::ValidationError;
use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Input rejected before or by the store (422)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No product with this id (404)
    #[error("Product not found")]
    NotFound { id: i64 },

    /// Name collides with an existing product (400)
    #[error("Product with name '{name}' already exists")]
    AlreadyExists { name: String },

    /// Any other store-level constraint failure (400)
    #[error("Database constraint violation")]
    ConstraintViolation { message: String },

    /// Anything the store could not classify (500)
    #[error(transparent)]
    Store(#[from] StoreError),
}
