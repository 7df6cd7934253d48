//! Per-holder stake list keyed by ownership id.

use crate::model::stake::PropertyStake;
use serde::{Deserialize, Serialize};

/// Current stakes held by one owner entity.
///
/// Absent records are treated as empty; they come into existence the first
/// time a property transaction names the owner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ownership {
    #[serde(default)]
    pub properties: Vec<PropertyStake>,
}

impl Ownership {
    pub fn stake_for(&self, property_id: &str) -> Option<&PropertyStake> {
        self.properties
            .iter()
            .find(|stake| stake.property_id() == property_id)
    }

    /// Drops every stake referencing `property_id` and returns how many went.
    pub fn remove_property(&mut self, property_id: &str) -> usize {
        let before = self.properties.len();
        self.properties
            .retain(|stake| stake.property_id() != property_id);
        before - self.properties.len()
    }

    /// Replaces any stake for the same property with `stake`.
    pub fn upsert(&mut self, stake: PropertyStake) {
        self.remove_property(stake.property_id());
        self.properties.push(stake);
    }
}
