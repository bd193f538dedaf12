//! # Repository Module
//!
//! The sale repository contract and its implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Repository                                      │
//! │                                                                         │
//! │  SalesService                                                          │
//! │       │                                                                 │
//! │       │  store.load(id) → mutate Sale → store.save(&sale)              │
//! │       ▼                                                                 │
//! │  SaleStore (trait)                                                     │
//! │  ├── load(&self, id)     → Option<Sale>                                │
//! │  ├── save(&self, &sale)  → create or overwrite, items included         │
//! │  ├── list(&self)         → Vec<Sale>                                   │
//! │  └── delete(&self, id)   → bool                                        │
//! │       │                                                                 │
//! │       ├──────────────────────────┐                                      │
//! │       ▼                          ▼                                      │
//! │  SqliteSaleStore            InMemorySaleStore                           │
//! │  (sqlx, one tx per save)    (RwLock<HashMap>)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores hand back whole aggregates. They never touch totals; a loaded
//! sale has its derived values recomputed by `Sale::restore`.

use std::future::Future;

use tally_core::{Sale, SaleId};

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

pub use memory::InMemorySaleStore;
pub use sqlite::SqliteSaleStore;

/// Persistence contract for the Sale aggregate.
///
/// Saving writes the sale and its full item collection as one unit
/// (last writer wins per sale id).
pub trait SaleStore: Send + Sync {
    /// Loads a sale with all of its items. `Ok(None)` if the id is unknown.
    fn load(&self, id: SaleId) -> impl Future<Output = DbResult<Option<Sale>>> + Send;

    /// Creates the sale or replaces the stored copy.
    fn save(&self, sale: &Sale) -> impl Future<Output = DbResult<()>> + Send;

    /// Every stored sale, ordered by date ascending.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Sale>>> + Send;

    /// Removes a sale and its items. Returns whether anything was deleted.
    fn delete(&self, id: SaleId) -> impl Future<Output = DbResult<bool>> + Send;
}
