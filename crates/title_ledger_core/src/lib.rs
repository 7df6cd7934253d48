//! Core ownership-reconciliation engine for the title ledger.
//! This crate keeps property sale records and per-owner stake records
//! consistent on top of a key-value ledger store.

pub mod api;
pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod repo;
pub mod service;
pub mod store;

pub use api::{supported_functions, InvokeError, InvokeResponse, LedgerApi};
pub use codec::{CodecError, CodecResult};
pub use config::LedgerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ids::{IdDisplayPolicy, StripPrefix, VerbatimIds};
pub use model::ownership::Ownership;
pub use model::property::Property;
pub use model::stake::{OwnerStake, PropertyStake, StakeRecord};
pub use model::validation::{validate_property, TransactionValidationError};
pub use model::RecordKind;
pub use reconcile::owner_diff::{diff_owners, OwnerSetDiff};
pub use reconcile::ownership_updater::{OwnershipRecordUpdater, OwnershipUpdateSummary};
pub use repo::record_repo::{
    HistoryRecord, LedgerError, LedgerRepository, LedgerResult, RecordHistory,
};
pub use service::ledger_query::LedgerQueryService;
pub use service::property_transaction::PropertyTransactionService;
pub use store::{
    run_in_transaction, HistoryEntry, HistoryIter, LedgerStore, SqliteLedgerStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
