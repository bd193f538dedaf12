//! # tally-core: Sale Aggregate and Pricing Rules
//!
//! This crate holds the sale domain as pure, synchronous code with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Sales Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tally-service (Application Layer)               │   │
//! │  │   create_sale, update_sale, cancel_sale, cancel_item, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   sale    │  │   money   │  │ discount  │  │ validation│  │   │
//! │  │   │   Sale    │  │   Money   │  │  tiers    │  │   rules   │  │   │
//! │  │   │ SaleItem  │  │ rounding  │  │   bps     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOGGING • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Persistence)                       │   │
//! │  │              SaleStore: SQLite and in-memory                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - The `Sale` aggregate root
//! - [`item`] - `SaleItem`, one discounted line
//! - [`discount`] - Quantity discount tiers
//! - [`money`] - Money type with integer arithmetic
//! - [`events`] - Notifications emitted after changes
//! - [`paging`] - Page math for listings
//! - [`validation`] - Command input checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use tally_core::{Money, Sale, SaleItem};
//!
//! let mut sale = Sale::new("S-0001", Utc::now(), "CUST-1", "BR-1");
//! let first = sale
//!     .add_item(SaleItem::new("P1", "Product 1", Money::from_cents(1000), 1).unwrap())
//!     .unwrap();
//! sale.add_item(SaleItem::new("P2", "Product 2", Money::from_cents(1000), 1).unwrap())
//!     .unwrap();
//! assert_eq!(sale.total().cents(), 2000);
//!
//! sale.cancel_item(first).unwrap();
//! assert_eq!(sale.total().cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod events;
pub mod item;
pub mod money;
pub mod paging;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::DiscountRate;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use events::SaleEvent;
pub use item::SaleItem;
pub use money::Money;
pub use paging::{Page, PageRequest};
pub use sale::Sale;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item in a sale.
///
/// ## Business Reason
/// Quantities above this are refused outright, never clamped.
pub const MAX_ITEM_QUANTITY: i64 = 20;
