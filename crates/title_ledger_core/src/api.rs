//! Invocation API for ledger callers.
//!
//! # Responsibility
//! - Expose the ledger entry points as JSON-in/JSON-out functions.
//! - Dispatch named invocations with argument-count checks.
//! - Run every invocation inside one store transaction.
//!
//! # Invariants
//! - `invoke` never panics; failures come back as `ok = false` envelopes.
//! - A failed invocation leaves no ledger writes behind.

use crate::codec::encode_view;
use crate::config::LedgerConfig;
use crate::db::{open_db, DbResult};
use crate::model::ids::{IdDisplayPolicy, StripPrefix};
use crate::model::property::Property;
use crate::model::stake::PropertyStake;
use crate::model::RecordKind;
use crate::repo::record_repo::{LedgerError, LedgerRepository, LedgerResult};
use crate::service::ledger_query::LedgerQueryService;
use crate::service::property_transaction::PropertyTransactionService;
use crate::store::run_in_transaction;
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FN_PROPERTY_TRANSACTION: &str = "propertyTransaction";
pub const FN_GET_PROPERTY: &str = "getProperty";
pub const FN_GET_PROPERTY_HISTORY: &str = "getPropertyHistory";
pub const FN_GET_ALL_PROPERTY: &str = "getAllProperty";
pub const FN_GET_OWNERSHIP: &str = "getOwnership";
pub const FN_GET_OWNERSHIP_HISTORY: &str = "getOwnershipHistory";
pub const FN_GET_ALL_OWNERSHIP: &str = "getAllOwnership";
pub const FN_QUERY: &str = "query";
pub const FN_DELETE: &str = "delete";

const SUPPORTED_FUNCTIONS: &[&str] = &[
    FN_PROPERTY_TRANSACTION,
    FN_GET_PROPERTY,
    FN_GET_PROPERTY_HISTORY,
    FN_GET_ALL_PROPERTY,
    FN_GET_OWNERSHIP,
    FN_GET_OWNERSHIP_HISTORY,
    FN_GET_ALL_OWNERSHIP,
    FN_QUERY,
    FN_DELETE,
];

/// Returns the function names accepted by `LedgerApi::invoke`.
pub fn supported_functions() -> &'static [&'static str] {
    SUPPORTED_FUNCTIONS
}

/// Expected argument count for one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, actual: usize) -> bool {
        match self {
            Self::Exactly(expected) => actual == expected,
            Self::AtLeast(minimum) => actual >= minimum,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(expected) => write!(f, "{expected}"),
            Self::AtLeast(minimum) => write!(f, "at least {minimum}"),
        }
    }
}

/// Dispatch-level failure.
#[derive(Debug)]
pub enum InvokeError {
    UnknownFunction(String),
    ArgumentCount {
        function: &'static str,
        expected: Arity,
        actual: usize,
    },
    Ledger(LedgerError),
}

impl Display for InvokeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFunction(name) => write!(
                f,
                "Invalid invoke function name `{name}`. Expecting one of: {}",
                SUPPORTED_FUNCTIONS.join(", ")
            ),
            Self::ArgumentCount {
                expected, actual, ..
            } => write!(
                f,
                "Incorrect number of arguments: expected {expected}, got {actual}"
            ),
            Self::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InvokeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LedgerError> for InvokeError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

/// Response envelope returned by `invoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeResponse {
    pub ok: bool,
    /// JSON payload for read functions; `None` for writes and failures.
    pub payload: Option<String>,
    /// Human-readable outcome for diagnostics.
    pub message: String,
}

impl InvokeResponse {
    fn success(payload: Option<String>) -> Self {
        Self {
            ok: true,
            payload,
            message: "OK".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct PropertyHistoryItem {
    #[serde(rename = "txId")]
    tx_id: String,
    property: Option<Property>,
}

#[derive(Serialize)]
struct OwnershipHistoryItem {
    #[serde(rename = "txId")]
    tx_id: String,
    properties: Option<Vec<PropertyStake>>,
}

/// Ledger entry points over one SQLite connection.
///
/// `P` decides how property ids are shown in ownership views.
pub struct LedgerApi<P: IdDisplayPolicy = StripPrefix> {
    conn: Connection,
    id_policy: P,
}

impl LedgerApi {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            id_policy: StripPrefix::default(),
        }
    }

    /// Opens the configured database and applies the configured id policy.
    pub fn open(config: &LedgerConfig) -> DbResult<Self> {
        let conn = open_db(&config.db_path)?;
        Ok(Self::new(conn).with_id_policy(config.id_display_policy()))
    }
}

impl<P: IdDisplayPolicy> LedgerApi<P> {
    pub fn with_id_policy<Q: IdDisplayPolicy>(self, id_policy: Q) -> LedgerApi<Q> {
        LedgerApi {
            conn: self.conn,
            id_policy,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Records a sale; see `PropertyTransactionService::execute`.
    pub fn property_transaction(
        &mut self,
        property_id: &str,
        property_json: &str,
    ) -> LedgerResult<()> {
        run_in_transaction(&mut self.conn, |store| {
            PropertyTransactionService::new(store).execute(property_id, property_json)
        })
    }

    pub fn get_property(&mut self, property_id: &str) -> LedgerResult<String> {
        run_in_transaction(&mut self.conn, |store| {
            let property = LedgerQueryService::new(store).get_property(property_id)?;
            encode_json(RecordKind::Property, property_id, &property)
        })
    }

    /// Returns `[{"txId":..,"property":{..}|null}, ...]`, oldest first.
    pub fn get_property_history(&mut self, property_id: &str) -> LedgerResult<String> {
        run_in_transaction(&mut self.conn, |store| {
            let query = LedgerQueryService::new(store);
            let items = query
                .property_history(property_id)?
                .map(|entry| {
                    entry.map(|entry| PropertyHistoryItem {
                        tx_id: entry.tx_id,
                        property: entry.record,
                    })
                })
                .collect::<LedgerResult<Vec<_>>>()?;
            encode_json(RecordKind::Property, property_id, &items)
        })
    }

    pub fn get_all_properties(&mut self, property_ids: &[String]) -> LedgerResult<String> {
        run_in_transaction(&mut self.conn, |store| {
            let properties = LedgerQueryService::new(store).get_all_properties(property_ids)?;
            encode_json(RecordKind::Property, &property_ids.join(","), &properties)
        })
    }

    /// Returns the owner's stakes with ids passed through the id policy.
    pub fn get_ownership(&mut self, ownership_id: &str) -> LedgerResult<String> {
        let id_policy = &self.id_policy;
        run_in_transaction(&mut self.conn, |store| {
            let stakes =
                LedgerQueryService::with_id_policy(store, id_policy).get_ownership(ownership_id)?;
            encode_json(RecordKind::Ownership, ownership_id, &stakes)
        })
    }

    /// Returns `[{"txId":..,"properties":[..]|null}, ...]`, oldest first.
    ///
    /// Property ids pass through the same display policy as `get_ownership`.
    pub fn get_ownership_history(&mut self, ownership_id: &str) -> LedgerResult<String> {
        let id_policy = &self.id_policy;
        run_in_transaction(&mut self.conn, |store| {
            let query = LedgerQueryService::with_id_policy(store, id_policy);
            let items = query
                .ownership_history(ownership_id)?
                .map(|entry| {
                    entry.map(|entry| OwnershipHistoryItem {
                        tx_id: entry.tx_id,
                        properties: entry
                            .record
                            .map(|ownership| query.display_stakes(&ownership.properties)),
                    })
                })
                .collect::<LedgerResult<Vec<_>>>()?;
            encode_json(RecordKind::Ownership, ownership_id, &items)
        })
    }

    pub fn get_all_ownerships(&mut self, ownership_ids: &[String]) -> LedgerResult<String> {
        let id_policy = &self.id_policy;
        run_in_transaction(&mut self.conn, |store| {
            let views = LedgerQueryService::with_id_policy(store, id_policy)
                .get_all_ownerships(ownership_ids)?;
            encode_json(RecordKind::Ownership, &ownership_ids.join(","), &views)
        })
    }

    /// Raw read of any key as `{"id":key,"value":<stored value>}`.
    ///
    /// Stored bytes that are not JSON are returned as a JSON string.
    pub fn query_value(&mut self, key: &str) -> LedgerResult<String> {
        run_in_transaction(&mut self.conn, |store| {
            let bytes = LedgerRepository::new(store)
                .load_raw(key)?
                .ok_or_else(|| LedgerError::NotFound {
                    kind: RecordKind::Raw,
                    id: key.to_string(),
                })?;
            let value = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            encode_json(
                RecordKind::Raw,
                key,
                &serde_json::json!({ "id": key, "value": value }),
            )
        })
    }

    /// Raw delete of any key; bypasses ownership reconciliation.
    pub fn delete_value(&mut self, key: &str) -> LedgerResult<()> {
        run_in_transaction(&mut self.conn, |store| {
            LedgerRepository::new(store).delete_raw(key)
        })
    }

    /// Dispatches one named invocation and wraps the outcome in an envelope.
    pub fn invoke(&mut self, function: &str, args: &[String]) -> InvokeResponse {
        match self.dispatch(function, args) {
            Ok(payload) => {
                info!("event=invoke module=api status=ok function={function} args={}", args.len());
                InvokeResponse::success(payload)
            }
            Err(err) => {
                warn!(
                    "event=invoke module=api status=error function={function} args={} error={err}",
                    args.len()
                );
                InvokeResponse::failure(err.to_string())
            }
        }
    }

    fn dispatch(&mut self, function: &str, args: &[String]) -> Result<Option<String>, InvokeError> {
        match function {
            FN_PROPERTY_TRANSACTION => {
                check_arity(FN_PROPERTY_TRANSACTION, Arity::Exactly(2), args)?;
                self.property_transaction(&args[0], &args[1])?;
                Ok(None)
            }
            FN_GET_PROPERTY => {
                check_arity(FN_GET_PROPERTY, Arity::Exactly(1), args)?;
                Ok(Some(self.get_property(&args[0])?))
            }
            FN_GET_PROPERTY_HISTORY => {
                check_arity(FN_GET_PROPERTY_HISTORY, Arity::Exactly(1), args)?;
                Ok(Some(self.get_property_history(&args[0])?))
            }
            FN_GET_ALL_PROPERTY => {
                check_arity(FN_GET_ALL_PROPERTY, Arity::AtLeast(1), args)?;
                Ok(Some(self.get_all_properties(args)?))
            }
            FN_GET_OWNERSHIP => {
                check_arity(FN_GET_OWNERSHIP, Arity::Exactly(1), args)?;
                Ok(Some(self.get_ownership(&args[0])?))
            }
            FN_GET_OWNERSHIP_HISTORY => {
                check_arity(FN_GET_OWNERSHIP_HISTORY, Arity::Exactly(1), args)?;
                Ok(Some(self.get_ownership_history(&args[0])?))
            }
            FN_GET_ALL_OWNERSHIP => {
                check_arity(FN_GET_ALL_OWNERSHIP, Arity::AtLeast(1), args)?;
                Ok(Some(self.get_all_ownerships(args)?))
            }
            FN_QUERY => {
                check_arity(FN_QUERY, Arity::Exactly(1), args)?;
                Ok(Some(self.query_value(&args[0])?))
            }
            FN_DELETE => {
                check_arity(FN_DELETE, Arity::Exactly(1), args)?;
                self.delete_value(&args[0])?;
                Ok(None)
            }
            other => Err(InvokeError::UnknownFunction(other.to_string())),
        }
    }
}

fn check_arity(function: &'static str, expected: Arity, args: &[String]) -> Result<(), InvokeError> {
    if expected.accepts(args.len()) {
        return Ok(());
    }
    Err(InvokeError::ArgumentCount {
        function,
        expected,
        actual: args.len(),
    })
}

fn encode_json<T: Serialize + ?Sized>(kind: RecordKind, key: &str, value: &T) -> LedgerResult<String> {
    encode_view(kind, value).map_err(|source| LedgerError::Codec {
        key: key.to_string(),
        source,
    })
}
