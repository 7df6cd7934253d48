//! Read paths for property and ownership records.
//!
//! # Invariants
//! - `NotFound` is only returned for keys that were never written (or were
//!   deleted); an ownership with zero stakes is a found result.
//! - Ownership views pass property ids through the configured display policy.

use crate::model::ids::{IdDisplayPolicy, StripPrefix};
use crate::model::ownership::Ownership;
use crate::model::property::Property;
use crate::model::stake::PropertyStake;
use crate::model::RecordKind;
use crate::repo::record_repo::{LedgerError, LedgerRepository, LedgerResult, RecordHistory};
use crate::store::LedgerStore;
use log::debug;

/// Query service over ledger records.
pub struct LedgerQueryService<S: LedgerStore, P: IdDisplayPolicy = StripPrefix> {
    repo: LedgerRepository<S>,
    id_policy: P,
}

impl<S: LedgerStore> LedgerQueryService<S> {
    /// Creates a query service that strips the default `property_` prefix.
    pub fn new(store: S) -> Self {
        Self::with_id_policy(store, StripPrefix::default())
    }
}

impl<S: LedgerStore, P: IdDisplayPolicy> LedgerQueryService<S, P> {
    pub fn with_id_policy(store: S, id_policy: P) -> Self {
        Self {
            repo: LedgerRepository::new(store),
            id_policy,
        }
    }

    pub fn get_property(&self, property_id: &str) -> LedgerResult<Property> {
        debug!("event=ledger_query module=service op=get_property property_id={property_id}");
        self.repo
            .load_property(property_id)?
            .ok_or_else(|| not_found(RecordKind::Property, property_id))
    }

    /// Returns the stakes held by `ownership_id`, ids shown per display policy.
    pub fn get_ownership(&self, ownership_id: &str) -> LedgerResult<Vec<PropertyStake>> {
        debug!("event=ledger_query module=service op=get_ownership ownership_id={ownership_id}");
        let ownership: Ownership = self
            .repo
            .load_ownership(ownership_id)?
            .ok_or_else(|| not_found(RecordKind::Ownership, ownership_id))?;

        Ok(self.display_stakes(&ownership.properties))
    }

    /// Copies `stakes` with property ids rewritten by the display policy.
    pub fn display_stakes(&self, stakes: &[PropertyStake]) -> Vec<PropertyStake> {
        stakes
            .iter()
            .map(|stake| {
                stake.with_display_id(self.id_policy.display_property_id(stake.property_id()))
            })
            .collect()
    }

    /// Loads several properties in argument order; the first missing id fails.
    pub fn get_all_properties<I, T>(&self, property_ids: I) -> LedgerResult<Vec<Property>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        property_ids
            .into_iter()
            .map(|id| self.get_property(id.as_ref()))
            .collect()
    }

    /// Loads several ownership views in argument order.
    pub fn get_all_ownerships<I, T>(&self, ownership_ids: I) -> LedgerResult<Vec<Vec<PropertyStake>>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        ownership_ids
            .into_iter()
            .map(|id| self.get_ownership(id.as_ref()))
            .collect()
    }

    /// Lazy oldest-first history of a property key.
    pub fn property_history(&self, property_id: &str) -> LedgerResult<RecordHistory<'_, Property>> {
        debug!("event=ledger_query module=service op=property_history property_id={property_id}");
        self.repo.property_history(property_id)
    }

    /// Lazy oldest-first history of an ownership key.
    ///
    /// Records come back as stored; use `display_stakes` for caller views.
    pub fn ownership_history(
        &self,
        ownership_id: &str,
    ) -> LedgerResult<RecordHistory<'_, Ownership>> {
        debug!("event=ledger_query module=service op=ownership_history ownership_id={ownership_id}");
        self.repo.ownership_history(ownership_id)
    }
}

fn not_found(kind: RecordKind, id: &str) -> LedgerError {
    LedgerError::NotFound {
        kind,
        id: id.to_string(),
    }
}
