//! # tally-db: Sale Persistence
//!
//! Loads and saves `Sale` aggregates. SQLite (through sqlx) for real use,
//! an in-memory map for tests and embedding.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Sales Data Flow                            │
//! │                                                                         │
//! │  SalesService::cancel_item                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  SaleStore    │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (trait)      │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SqliteSale-   │    │ 001_create_  │  │   │
//! │  │   │ + retry       │    │   Store       │    │  sales.sql   │  │   │
//! │  │   │               │    │ InMemorySale- │    │              │  │   │
//! │  │   │               │    │   Store       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (sales.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - `SaleStore` and its implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig, SaleStore};
//!
//! let db = Database::new(DbConfig::new("sales.db")).await?;
//! let store = db.sales();
//! store.save(&sale).await?;
//! let loaded = store.load(sale.id()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{InMemorySaleStore, SaleStore, SqliteSaleStore};
