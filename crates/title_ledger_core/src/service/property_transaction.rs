//! Property transaction use-case.
//!
//! # Responsibility
//! - Sequence decode, validation, owner diff, ownership update and property
//!   persistence for one sale.
//!
//! # Invariants
//! - Nothing touches the store before the payload decodes and validates.
//! - The property record is written only after every ownership write
//!   succeeded; a failed ownership update means no property write.
//! - The stored property id always equals the key it is stored under.
//! - A key already holding an ownership record is never overwritten by a
//!   property, and a sale never names its own property id as an owner.

use crate::codec::decode_property;
use crate::model::property::Property;
use crate::reconcile::owner_diff::diff_owners;
use crate::reconcile::ownership_updater::OwnershipRecordUpdater;
use crate::repo::record_repo::{LedgerError, LedgerRepository, LedgerResult};
use crate::store::LedgerStore;
use log::{info, warn};
use std::time::Instant;

/// Orchestrates property sales against one ledger store.
pub struct PropertyTransactionService<S: LedgerStore> {
    repo: LedgerRepository<S>,
}

impl<S: LedgerStore> PropertyTransactionService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: LedgerRepository::new(store),
        }
    }

    /// Records a sale of `property_id` described by the JSON `raw_payload`.
    ///
    /// # Errors
    /// - `Decode` when the payload is not a property record.
    /// - `Validation` for the first failed sale/owner check.
    /// - `Store`/`Codec` when ledger reads or writes fail; ownership records
    ///   written before the failure are not reverted here.
    pub fn execute(&self, property_id: &str, raw_payload: &str) -> LedgerResult<()> {
        let started_at = Instant::now();
        info!(
            "event=property_tx module=service status=start property_id={} tx_id={}",
            property_id,
            self.repo.tx_id()
        );

        match self.run(property_id, raw_payload) {
            Ok(owners) => {
                info!(
                    "event=property_tx module=service status=ok property_id={} tx_id={} owners={} duration_ms={}",
                    property_id,
                    self.repo.tx_id(),
                    owners,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let status = match err {
                    LedgerError::Decode(_) | LedgerError::Validation(_) => "rejected",
                    _ => "error",
                };
                warn!(
                    "event=property_tx module=service status={} property_id={} tx_id={} duration_ms={} error_code={} error={}",
                    status,
                    property_id,
                    self.repo.tx_id(),
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn run(&self, property_id: &str, raw_payload: &str) -> LedgerResult<usize> {
        let mut property = decode_property(raw_payload.as_bytes()).map_err(LedgerError::Decode)?;
        property.property_id = property_id.to_string();
        property.validate()?;
        property.tx_id = self.repo.tx_id().to_string();

        let previous_owners = self
            .repo
            .load_property(property_id)?
            .map(|previous: Property| previous.owners)
            .unwrap_or_default();

        let diff = diff_owners(&property.owners, &previous_owners);
        let summary = OwnershipRecordUpdater::new(&self.repo).apply(&diff, &property)?;
        info!(
            "event=ownership_reconcile module=service status=ok property_id={} removed={} added={} unchanged={}",
            property_id, summary.removed, summary.added, summary.unchanged
        );

        self.repo.save_property(&property)?;
        Ok(property.owners.len())
    }
}
