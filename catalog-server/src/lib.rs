//! catalog-server: HTTP CRUD service for products
//!
//! One `products` table behind two interchangeable storage backends
//! (sea-orm and raw sqlx), selected once at startup.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;
pub mod store;

pub use config::{ConfigError, Settings};
pub use http::{build_router, run_server, AppState};
pub use service::{ProductService, ServiceError};
pub use store::{build_store, ProductStore, StoreKind};
