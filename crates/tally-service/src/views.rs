//! # Read Models
//!
//! Serializable snapshots of a sale for query results.
//!
//! ## JSON Shape
//! ```json
//! {
//!   "id": "550e8400-e29b-41d4-a716-446655440000",
//!   "sale_number": "S-0001",
//!   "date": "2024-03-01T10:00:00Z",
//!   "customer_id": "CUST-1",
//!   "branch_id": "BR-1",
//!   "is_cancelled": false,
//!   "total": 3600,
//!   "items": [
//!     { "id": "...", "product_id": "P1", "product_name": "Product 1",
//!       "unit_price": 1000, "quantity": 4, "discount_bps": 1000,
//!       "total": 3600, "is_cancelled": false }
//!   ]
//! }
//! ```
//! Money values are integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::{DiscountRate, Money, Sale, SaleId, SaleItem, SaleItemId};

/// One item as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemView {
    pub id: SaleItemId,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(rename = "discount_bps")]
    pub discount: DiscountRate,
    pub total: Money,
    pub is_cancelled: bool,
}

impl From<&SaleItem> for SaleItemView {
    fn from(item: &SaleItem) -> Self {
        SaleItemView {
            id: item.id(),
            product_id: item.product_id().to_string(),
            product_name: item.product_name().to_string(),
            unit_price: item.unit_price(),
            quantity: item.quantity(),
            discount: item.discount(),
            total: item.total(),
            is_cancelled: item.is_cancelled(),
        }
    }
}

/// A sale with all of its items, cancelled ones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleView {
    pub id: SaleId,
    pub sale_number: String,
    pub date: DateTime<Utc>,
    pub customer_id: String,
    pub branch_id: String,
    pub is_cancelled: bool,
    pub total: Money,
    pub items: Vec<SaleItemView>,
}

impl From<&Sale> for SaleView {
    fn from(sale: &Sale) -> Self {
        SaleView {
            id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            date: sale.date(),
            customer_id: sale.customer_id().to_string(),
            branch_id: sale.branch_id().to_string(),
            is_cancelled: sale.is_cancelled(),
            total: sale.total(),
            items: sale.items().iter().map(SaleItemView::from).collect(),
        }
    }
}

impl From<Sale> for SaleView {
    fn from(sale: Sale) -> Self {
        SaleView::from(&sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mirrors_sale() {
        let mut sale = Sale::new("S-1", Utc::now(), "C1", "B1");
        let id = sale
            .add_item(SaleItem::new("P1", "Product 1", Money::from_cents(1000), 4).unwrap())
            .unwrap();
        sale.add_item(SaleItem::new("P2", "Product 2", Money::from_cents(500), 1).unwrap())
            .unwrap();
        sale.cancel_item(id).unwrap();

        let view = SaleView::from(&sale);

        assert_eq!(view.id, sale.id());
        assert_eq!(view.total, Money::from_cents(500));
        assert_eq!(view.items.len(), 2);
        assert!(view.items[0].is_cancelled);
        assert_eq!(view.items[0].discount, DiscountRate::TEN_PERCENT);
    }

    #[test]
    fn test_view_json_uses_cents_and_bps() {
        let mut sale = Sale::new("S-1", Utc::now(), "C1", "B1");
        sale.add_item(SaleItem::new("P1", "Product 1", Money::from_cents(500), 10).unwrap())
            .unwrap();

        let json = serde_json::to_value(SaleView::from(&sale)).unwrap();

        assert_eq!(json["total"], 4000);
        assert_eq!(json["items"][0]["unit_price"], 500);
        assert_eq!(json["items"][0]["discount_bps"], 2000);
        assert_eq!(json["items"][0]["is_cancelled"], false);
    }
}
