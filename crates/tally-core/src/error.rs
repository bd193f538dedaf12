//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Sale aggregate rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  tally-service errors                                                  │
//! │  └── ServiceError     - What callers of the handlers see               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError ← DbError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Failure
//! Every `CoreError` is either a **domain-rule** violation (expected, the
//! caller turns it into a validation response) or a **contract** violation
//! (the calling layer misused the aggregate). See [`ErrorKind`].

use thiserror::Error;

use crate::types::SaleItemId;

// =============================================================================
// Core Error
// =============================================================================

/// Sale aggregate errors.
///
/// The aggregate fails fast with one of these and never logs or retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Item quantity is zero or negative.
    #[error("Quantity must be greater than zero (requested {requested})")]
    QuantityNotPositive { requested: i64 },

    /// Item quantity exceeds the per-item limit.
    ///
    /// ## When This Occurs
    /// - Constructing a `SaleItem` with quantity 21 or more
    /// - `Sale::add_item` / `Sale::replace_items` redundant limit check
    #[error("Maximum quantity per item is {max} (requested {requested})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Unit price is below zero.
    #[error("Unit price cannot be negative (got {cents} cents)")]
    NegativeUnitPrice { cents: i64 },

    /// No item with this id exists in the sale.
    #[error("Item not found in sale: {0}")]
    ItemNotFound(SaleItemId),

    /// A line or sale total does not fit in the money representation.
    ///
    /// ## When This Occurs
    /// - Unit price × quantity beyond `i64` cents
    /// - The sum of active item totals beyond `i64` cents
    #[error("Amount is too large to record")]
    AmountOverflow,

    /// The same item id was handed to the sale twice.
    ///
    /// ## When This Occurs
    /// - Adding a cloned item whose original is already in the sale
    /// - A replacement batch containing two items with one id
    #[error("Item {0} is already part of the sale")]
    DuplicateItem(SaleItemId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A business precondition failed; recoverable by the caller.
    DomainRule,
    /// The calling layer misused the aggregate.
    Contract,
}

impl CoreError {
    /// Returns whether this is a domain-rule or a contract violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::DuplicateItem(_) => ErrorKind::Contract,
            CoreError::QuantityNotPositive { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::NegativeUnitPrice { .. }
            | CoreError::ItemNotFound(_)
            | CoreError::AmountOverflow
            | CoreError::Validation(_) => ErrorKind::DomainRule,
        }
    }

    /// Shorthand for `kind() == ErrorKind::DomainRule`.
    pub fn is_domain_rule(&self) -> bool {
        self.kind() == ErrorKind::DomainRule
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when command input doesn't meet requirements.
/// Used for early validation before the aggregate is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A collection that needs at least one entry is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A validation failure inside one of the sale's items.
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wraps an item-level error with the item's position in the request.
    pub fn in_item(index: usize, source: ValidationError) -> Self {
        ValidationError::Item {
            index,
            source: Box::new(source),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
