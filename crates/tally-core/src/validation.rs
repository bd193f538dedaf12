//! # Validation Module
//!
//! Input validation for sale commands.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (request shape)                                  │
//! │  ├── Required references (customer, branch, product)                   │
//! │  ├── Lengths, positive prices                                          │
//! │  └── Quantity 1..=20                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Sale aggregate (business invariants)                         │
//! │  ├── Discount tiers, totals                                            │
//! │  └── Quantity limit re-checked, never clamped                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key sale_items → sales                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_quantity, validate_required};
//!
//! validate_required("customer_id", "CUST-1").unwrap();
//! assert!(validate_quantity(21).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::SaleItemInput;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest accepted sale number.
pub const MAX_SALE_NUMBER_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required("product_name", name)?;

    if name.trim().chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "product_name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a caller-supplied sale number. Blank means "generate one".
pub fn validate_sale_number(sale_number: &str) -> ValidationResult<()> {
    if sale_number.trim().chars().count() > MAX_SALE_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "sale_number".to_string(),
            max: MAX_SALE_NUMBER_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(20).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(21).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Requests must carry a price above zero.
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Command Validators
// =============================================================================

/// Validates one requested line item.
pub fn validate_item_input(item: &SaleItemInput) -> ValidationResult<()> {
    validate_required("product_id", &item.product_id)?;
    validate_product_name(&item.product_name)?;
    validate_unit_price_cents(item.unit_price.cents())?;
    validate_quantity(item.quantity)?;
    Ok(())
}

/// Validates a list of items, tagging the first failure with its position.
pub fn validate_items(items: &[SaleItemInput]) -> ValidationResult<()> {
    for (index, item) in items.iter().enumerate() {
        validate_item_input(item).map_err(|e| ValidationError::in_item(index, e))?;
    }
    Ok(())
}

/// Validates a create-sale request.
///
/// ## Rules
/// - `customer_id` and `branch_id` required
/// - optional `sale_number` at most 50 characters
/// - at least one item, each item valid
pub fn validate_new_sale(
    customer_id: &str,
    branch_id: &str,
    sale_number: Option<&str>,
    items: &[SaleItemInput],
) -> ValidationResult<()> {
    validate_required("customer_id", customer_id)?;
    validate_required("branch_id", branch_id)?;

    if let Some(number) = sale_number {
        validate_sale_number(number)?;
    }

    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    validate_items(items)
}

/// Validates an update-sale request. An empty list clears the sale.
pub fn validate_sale_update(items: &[SaleItemInput]) -> ValidationResult<()> {
    validate_items(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn line(quantity: i64) -> SaleItemInput {
        SaleItemInput::new("P1", "Product 1", Money::from_cents(1000), quantity)
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("customer_id", "C1").is_ok());
        assert_eq!(
            validate_required("customer_id", "   "),
            Err(ValidationError::Required {
                field: "customer_id".to_string()
            })
        );
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(matches!(
            validate_product_name(&"x".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_sale_number() {
        assert!(validate_sale_number("").is_ok());
        assert!(validate_sale_number("S-2024-0001").is_ok());
        assert!(validate_sale_number(&"9".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(20).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(21).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price_cents(1).is_ok());
        assert!(validate_unit_price_cents(0).is_err());
        assert!(validate_unit_price_cents(-100).is_err());
    }

    #[test]
    fn test_new_sale_requires_items() {
        assert_eq!(
            validate_new_sale("C1", "B1", None, &[]),
            Err(ValidationError::Empty {
                field: "items".to_string()
            })
        );
    }

    #[test]
    fn test_new_sale_requires_references() {
        assert!(matches!(
            validate_new_sale("", "B1", None, &[line(1)]),
            Err(ValidationError::Required { field }) if field == "customer_id"
        ));
        assert!(matches!(
            validate_new_sale("C1", " ", None, &[line(1)]),
            Err(ValidationError::Required { field }) if field == "branch_id"
        ));
    }

    #[test]
    fn test_new_sale_reports_failing_item_index() {
        let err = validate_new_sale("C1", "B1", Some("S-1"), &[line(1), line(25)]).unwrap_err();
        match err {
            ValidationError::Item { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, ValidationError::OutOfRange { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_update_allows_empty_items() {
        assert!(validate_sale_update(&[]).is_ok());
        assert!(validate_sale_update(&[line(0)]).is_err());
    }

    #[test]
    fn test_item_requires_product_reference() {
        let mut item = line(1);
        item.product_id = String::new();
        assert!(matches!(
            validate_item_input(&item),
            Err(ValidationError::Required { field }) if field == "product_id"
        ));
    }
}
