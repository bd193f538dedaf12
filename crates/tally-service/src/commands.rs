//! Command inputs for the sale handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::{SaleId, SaleItemInput};

/// Request to record a new sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSale {
    /// Blank or absent means "generate one".
    #[serde(default)]
    pub sale_number: Option<String>,

    /// Defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    pub customer_id: String,
    pub branch_id: String,
    pub items: Vec<SaleItemInput>,
}

impl CreateSale {
    pub fn new(
        customer_id: impl Into<String>,
        branch_id: impl Into<String>,
        items: Vec<SaleItemInput>,
    ) -> Self {
        CreateSale {
            sale_number: None,
            date: None,
            customer_id: customer_id.into(),
            branch_id: branch_id.into(),
            items,
        }
    }

    pub fn with_sale_number(mut self, sale_number: impl Into<String>) -> Self {
        self.sale_number = Some(sale_number.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Request to replace a sale's items (and optionally move its date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSale {
    pub sale_id: SaleId,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// The complete new item list. Empty clears the sale.
    pub items: Vec<SaleItemInput>,
}

impl UpdateSale {
    pub fn new(sale_id: SaleId, items: Vec<SaleItemInput>) -> Self {
        UpdateSale {
            sale_id,
            date: None,
            items,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}
