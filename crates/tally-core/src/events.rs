//! # Sale Events
//!
//! Notifications emitted after a sale change has been persisted.
//!
//! Events are plain data. Delivering them is the publisher's job
//! (`tally-service`), and a failed delivery never undoes the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::sale::Sale;
use crate::types::{SaleId, SaleItemId};

/// Something that happened to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SaleEvent {
    /// A new sale was recorded.
    SaleCreated {
        sale_id: SaleId,
        sale_number: String,
        date: DateTime<Utc>,
        total: Money,
    },

    /// A sale's items were replaced or one was removed.
    SaleModified {
        sale_id: SaleId,
        sale_number: String,
        total: Money,
    },

    /// The whole sale was cancelled.
    SaleCancelled { sale_id: SaleId, sale_number: String },

    /// One item was cancelled; `total` is the sale total afterwards.
    ItemCancelled {
        sale_id: SaleId,
        item_id: SaleItemId,
        total: Money,
    },
}

impl SaleEvent {
    pub fn created(sale: &Sale) -> Self {
        SaleEvent::SaleCreated {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            date: sale.date(),
            total: sale.total(),
        }
    }

    pub fn modified(sale: &Sale) -> Self {
        SaleEvent::SaleModified {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            total: sale.total(),
        }
    }

    pub fn cancelled(sale: &Sale) -> Self {
        SaleEvent::SaleCancelled {
            sale_id: sale.id(),
            sale_number: sale.sale_number().to_string(),
        }
    }

    pub fn item_cancelled(sale: &Sale, item_id: SaleItemId) -> Self {
        SaleEvent::ItemCancelled {
            sale_id: sale.id(),
            item_id,
            total: sale.total(),
        }
    }

    /// Stable name used as the log/message type.
    pub fn event_type(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated { .. } => "sale_created",
            SaleEvent::SaleModified { .. } => "sale_modified",
            SaleEvent::SaleCancelled { .. } => "sale_cancelled",
            SaleEvent::ItemCancelled { .. } => "item_cancelled",
        }
    }

    /// The sale this event is about.
    pub fn sale_id(&self) -> SaleId {
        match self {
            SaleEvent::SaleCreated { sale_id, .. }
            | SaleEvent::SaleModified { sale_id, .. }
            | SaleEvent::SaleCancelled { sale_id, .. }
            | SaleEvent::ItemCancelled { sale_id, .. } => *sale_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::SaleItem;

    fn sale() -> Sale {
        let mut sale = Sale::new("S-7", Utc::now(), "C1", "B1");
        sale.add_item(SaleItem::new("P1", "Product 1", Money::from_cents(1000), 4).unwrap())
            .unwrap();
        sale
    }

    #[test]
    fn test_created_event_carries_snapshot() {
        let sale = sale();
        let event = SaleEvent::created(&sale);

        assert_eq!(event.event_type(), "sale_created");
        assert_eq!(event.sale_id(), sale.id());
        match event {
            SaleEvent::SaleCreated {
                sale_number,
                date,
                total,
                ..
            } => {
                assert_eq!(sale_number, "S-7");
                assert_eq!(date, sale.date());
                assert_eq!(total, Money::from_cents(3600));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_event_json_is_tagged() {
        let sale = sale();
        let json = serde_json::to_value(SaleEvent::cancelled(&sale)).unwrap();

        assert_eq!(json["event"], "sale_cancelled");
        assert_eq!(json["sale_number"], "S-7");
        assert_eq!(json["sale_id"], sale.id().to_string());
    }

    #[test]
    fn test_item_cancelled_reports_new_total() {
        let mut sale = sale();
        let item_id = sale.items()[0].id();
        sale.cancel_item(item_id).unwrap();

        let json = serde_json::to_value(SaleEvent::item_cancelled(&sale, item_id)).unwrap();
        assert_eq!(json["event"], "item_cancelled");
        assert_eq!(json["total"], 0);
    }
}
