//! Key-value ledger store boundary.
//!
//! # Responsibility
//! - Define the `LedgerStore` contract consumed by the reconciliation core.
//! - Provide the SQLite-backed implementation and its invocation boundary.
//!
//! # Invariants
//! - `history` yields entries oldest to newest; `None` values mark deletions.
//! - Store errors are surfaced verbatim; implementations never retry.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite_store;

pub use sqlite_store::{run_in_transaction, SqliteLedgerStore, HISTORY_PAGE_SIZE};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a ledger store backend.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// Backend-specific failure that has no richer error type.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "ledger store failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// One write event in a key's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: String,
    /// `None` when the event deleted the key.
    pub value: Option<Vec<u8>>,
}

/// Lazy history sequence returned by `LedgerStore::history`.
pub type HistoryIter<'a> = Box<dyn Iterator<Item = StoreResult<HistoryEntry>> + 'a>;

/// Storage interface for the ledger.
pub trait LedgerStore {
    /// Id of the ledger transaction enclosing the current invocation.
    fn tx_id(&self) -> &str;
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()>;
    fn delete_state(&self, key: &str) -> StoreResult<()>;
    fn history(&self, key: &str) -> StoreResult<HistoryIter<'_>>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn tx_id(&self) -> &str {
        (**self).tx_id()
    }

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }

    fn delete_state(&self, key: &str) -> StoreResult<()> {
        (**self).delete_state(key)
    }

    fn history(&self, key: &str) -> StoreResult<HistoryIter<'_>> {
        (**self).history(key)
    }
}
