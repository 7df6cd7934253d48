//! Sale record keyed by property id.

use crate::model::stake::OwnerStake;
use crate::model::validation::{validate_property, TransactionValidationError};
use serde::{Deserialize, Serialize};

/// One sale event for a property.
///
/// Stored under its `property_id`; later sales overwrite the record and the
/// store history is the only version trail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    /// Ledger transaction that wrote this record.
    #[serde(rename = "txid", default)]
    pub tx_id: String,
    #[serde(rename = "id", default)]
    pub property_id: String,
    #[serde(rename = "saleDate", default)]
    pub sale_date: String,
    #[serde(rename = "salePrice", default)]
    pub sale_price: f64,
    #[serde(default)]
    pub owners: Vec<OwnerStake>,
}

impl Property {
    pub fn new(
        property_id: impl Into<String>,
        sale_date: impl Into<String>,
        sale_price: f64,
        owners: Vec<OwnerStake>,
    ) -> Self {
        Self {
            tx_id: String::new(),
            property_id: property_id.into(),
            sale_date: sale_date.into(),
            sale_price,
            owners,
        }
    }

    /// Checks sale date, price, owner presence and percentage total.
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_property(self)
    }

    /// Returns the first owner entry for `ownership_id`.
    pub fn owner(&self, ownership_id: &str) -> Option<&OwnerStake> {
        self.owners
            .iter()
            .find(|owner| owner.ownership_id() == ownership_id)
    }
}
