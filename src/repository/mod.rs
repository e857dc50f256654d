//! Entity Repository module
//!
//! Typed reads and writes over albums, users and purchases.
//! The purchase insert runs inside a scoped transaction together with
//! the stock decrement.

mod album;
mod error;
mod purchase;
mod user;

use crate::db::Store;

pub use error::RepositoryError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository over the catalog, account and purchase tables
#[derive(Debug, Clone)]
pub struct Repository {
    store: Store,
}

impl Repository {
    /// Create a new Repository backed by `store`
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
