//! # Domain Types
//!
//! Identifier and input types shared by the Sale aggregate and its callers.
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Identity                                        │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │     SaleId      │  owns  │   SaleItemId    │                        │
//! │  │  UUID v4        │───────►│  UUID v4        │                        │
//! │  │  repository key │  1..n  │  lookup inside  │                        │
//! │  └─────────────────┘        │  its sale only  │                        │
//! │                             └─────────────────┘                        │
//! │                                                                         │
//! │  External references (customer, branch, product) are opaque strings.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a sale (the aggregate root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(Uuid);

impl SaleId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        SaleId(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        SaleId(id)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SaleId {
    fn default() -> Self {
        SaleId::new()
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SaleId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid("sale_id", s).map(SaleId)
    }
}

/// Identifier of a line item, unique within its sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleItemId(Uuid);

impl SaleItemId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        SaleItemId(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        SaleItemId(id)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SaleItemId {
    fn default() -> Self {
        SaleItemId::new()
    }
}

impl fmt::Display for SaleItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SaleItemId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uuid("item_id", s).map(SaleItemId)
    }
}

fn parse_uuid(field: &str, s: &str) -> Result<Uuid, ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Uuid::parse_str(s.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })
}

// =============================================================================
// Item Input
// =============================================================================

/// Caller-supplied data for one line item (create and update commands).
///
/// Carries no discount or total: those are always derived by the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemInput {
    /// External product reference.
    pub product_id: String,

    /// Product display name at time of sale (denormalized).
    pub product_name: String,

    /// Price per unit in cents.
    pub unit_price: Money,

    /// Units sold.
    pub quantity: i64,
}

impl SaleItemInput {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        SaleItemInput {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
