//! Database layer - connection pool and schema bootstrap
//!
//! # Design Principles
//!
//! - One pool per process, shared by whichever backend is active
//! - Rely on DB constraints (UNIQUE, NOT NULL), no check-then-insert
//! - Transactions for every mutating statement

pub mod pool;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
