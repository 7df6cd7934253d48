//! Typed record access over a `LedgerStore`.
//!
//! # Responsibility
//! - Load/save `Property` and `Ownership` records by key.
//! - Decode key history lazily into typed history records.
//!
//! # Invariants
//! - Absent keys load as `None`, never as an error.
//! - Stored bytes that fail to decode are reported, not masked. A record of
//!   the other family under a shared key is a decode failure.

use crate::codec::{
    decode_stored_ownership, decode_stored_property, encode_ownership, encode_property,
    CodecError, CodecResult,
};
use crate::model::ownership::Ownership;
use crate::model::property::Property;
use crate::model::validation::TransactionValidationError;
use crate::model::RecordKind;
use crate::store::{HistoryIter, LedgerStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error returned by every ledger read and write path.
#[derive(Debug)]
pub enum LedgerError {
    /// Caller payload could not be decoded.
    Decode(CodecError),
    /// Caller payload decoded but failed validation.
    Validation(TransactionValidationError),
    NotFound { kind: RecordKind, id: String },
    Store(StoreError),
    /// A stored record could not be decoded or a record could not be encoded.
    Codec { key: String, source: CodecError },
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.as_str()),
            Self::Store(err) => write!(f, "{err}"),
            Self::Codec { key, source } => write!(f, "{source} (key `{key}`)"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Store(err) => Some(err),
            Self::Codec { source, .. } => Some(source),
        }
    }
}

impl From<TransactionValidationError> for LedgerError {
    fn from(value: TransactionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl LedgerError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Validation(_) => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::Store(_) => "store_error",
            Self::Codec { .. } => "codec_error",
        }
    }
}

/// One decoded history event for a record key.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord<T> {
    pub tx_id: String,
    /// `None` when the event deleted the key.
    pub record: Option<T>,
}

/// Lazy, oldest-first history of one record key.
pub struct RecordHistory<'a, T> {
    entries: HistoryIter<'a>,
    key: String,
    decode: fn(&[u8]) -> CodecResult<T>,
}

impl<T> Iterator for RecordHistory<'_, T> {
    type Item = LedgerResult<HistoryRecord<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(err.into())),
        };

        let record = match entry.value.as_deref().map(self.decode).transpose() {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(LedgerError::Codec {
                    key: self.key.clone(),
                    source,
                }))
            }
        };

        Some(Ok(HistoryRecord {
            tx_id: entry.tx_id,
            record,
        }))
    }
}

/// Typed access to ledger records through a store implementation.
pub struct LedgerRepository<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tx_id(&self) -> &str {
        self.store.tx_id()
    }

    pub fn load_property(&self, property_id: &str) -> LedgerResult<Option<Property>> {
        self.load(property_id, decode_stored_property)
    }

    /// Writes `property` under its own `property_id`.
    pub fn save_property(&self, property: &Property) -> LedgerResult<()> {
        self.save(&property.property_id, encode_property(property))
    }

    pub fn load_ownership(&self, ownership_id: &str) -> LedgerResult<Option<Ownership>> {
        self.load(ownership_id, decode_stored_ownership)
    }

    pub fn save_ownership(&self, ownership_id: &str, ownership: &Ownership) -> LedgerResult<()> {
        self.save(ownership_id, encode_ownership(ownership))
    }

    pub fn property_history(&self, property_id: &str) -> LedgerResult<RecordHistory<'_, Property>> {
        self.history(property_id, decode_stored_property)
    }

    pub fn ownership_history(
        &self,
        ownership_id: &str,
    ) -> LedgerResult<RecordHistory<'_, Ownership>> {
        self.history(ownership_id, decode_stored_ownership)
    }

    /// Reads raw bytes without assuming a record family.
    pub fn load_raw(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.store.get_state(key)?)
    }

    pub fn delete_raw(&self, key: &str) -> LedgerResult<()> {
        Ok(self.store.delete_state(key)?)
    }

    fn load<T>(&self, key: &str, decode: fn(&[u8]) -> CodecResult<T>) -> LedgerResult<Option<T>> {
        let Some(bytes) = self.store.get_state(key)? else {
            return Ok(None);
        };
        decode(&bytes).map(Some).map_err(|source| LedgerError::Codec {
            key: key.to_string(),
            source,
        })
    }

    fn save(&self, key: &str, encoded: CodecResult<Vec<u8>>) -> LedgerResult<()> {
        let bytes = encoded.map_err(|source| LedgerError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.store.put_state(key, &bytes)?;
        Ok(())
    }

    fn history<T>(
        &self,
        key: &str,
        decode: fn(&[u8]) -> CodecResult<T>,
    ) -> LedgerResult<RecordHistory<'_, T>> {
        Ok(RecordHistory {
            entries: self.store.history(key)?,
            key: key.to_string(),
            decode,
        })
    }
}
