//! Domain models with validation at construction
//!
//! All user input is validated when converted into these types.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod product;
pub mod validation;

pub use pagination::{Page, PageParams};
pub use product::{NewProduct, Product, ProductChanges, ProductCreate, ProductName, ProductUpdate};
pub use validation::ValidationError;
