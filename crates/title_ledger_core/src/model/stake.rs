//! Stake value types.
//!
//! The ledger stores one stake shape (`StakeRecord`) in two places: as an
//! owner entry inside a property and as a property reference inside an
//! ownership record. `OwnerStake` and `PropertyStake` wrap that shape so the
//! two id namespaces cannot be mixed up in application code.

use serde::{Deserialize, Serialize};

/// Storage-level stake shape shared by both record families.
///
/// `id` is an ownership id or a property id depending on the container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StakeRecord {
    pub id: String,
    /// Fraction of the property held, in `(0, 1]` for accepted records.
    /// Older payloads spell this field `percentage`.
    #[serde(alias = "percentage", default)]
    pub percent: f64,
    #[serde(rename = "saleDate", default, skip_serializing_if = "String::is_empty")]
    pub sale_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Owner entry inside a `Property`; `id` is an ownership id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerStake(StakeRecord);

impl OwnerStake {
    pub fn new(ownership_id: impl Into<String>, percent: f64) -> Self {
        Self(StakeRecord {
            id: ownership_id.into(),
            percent,
            ..StakeRecord::default()
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    pub fn with_sale_date(mut self, sale_date: impl Into<String>) -> Self {
        self.0.sale_date = sale_date.into();
        self
    }

    pub fn ownership_id(&self) -> &str {
        &self.0.id
    }

    pub fn percent(&self) -> f64 {
        self.0.percent
    }

    pub fn sale_date(&self) -> &str {
        &self.0.sale_date
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn as_record(&self) -> &StakeRecord {
        &self.0
    }
}

impl From<StakeRecord> for OwnerStake {
    fn from(value: StakeRecord) -> Self {
        Self(value)
    }
}

/// Property reference inside an `Ownership`; `id` is a property id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStake(StakeRecord);

impl PropertyStake {
    pub fn new(property_id: impl Into<String>, percent: f64) -> Self {
        Self(StakeRecord {
            id: property_id.into(),
            percent,
            ..StakeRecord::default()
        })
    }

    /// Builds the reference an owner keeps for one sale.
    ///
    /// Percent and name come from the owner entry; the sale date comes from
    /// the property itself.
    pub fn for_owner(property_id: &str, sale_date: &str, owner: &OwnerStake) -> Self {
        Self(StakeRecord {
            id: property_id.to_string(),
            percent: owner.percent(),
            sale_date: sale_date.to_string(),
            name: owner.0.name.clone(),
        })
    }

    pub fn with_sale_date(mut self, sale_date: impl Into<String>) -> Self {
        self.0.sale_date = sale_date.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    pub fn property_id(&self) -> &str {
        &self.0.id
    }

    pub fn percent(&self) -> f64 {
        self.0.percent
    }

    pub fn sale_date(&self) -> &str {
        &self.0.sale_date
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn as_record(&self) -> &StakeRecord {
        &self.0
    }

    /// Returns a copy whose id is rewritten for display.
    pub(crate) fn with_display_id(&self, display_id: String) -> Self {
        let mut record = self.0.clone();
        record.id = display_id;
        Self(record)
    }
}

impl From<StakeRecord> for PropertyStake {
    fn from(value: StakeRecord) -> Self {
        Self(value)
    }
}
