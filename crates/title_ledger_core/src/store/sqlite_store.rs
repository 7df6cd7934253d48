//! SQLite-backed ledger store.
//!
//! # Responsibility
//! - Keep current key values in `ledger_state`.
//! - Append every put/delete to `ledger_history` under the invocation tx id.
//! - Wrap one invocation in one SQLite transaction.
//!
//! # Invariants
//! - History rows are ordered by the autoincrement `seq` column.
//! - A failed invocation rolls back every write it issued.

use super::{HistoryEntry, HistoryIter, LedgerStore, StoreError, StoreResult};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::VecDeque;
use uuid::Uuid;

/// Rows fetched per history page.
pub const HISTORY_PAGE_SIZE: u32 = 64;

/// Ledger store over a borrowed SQLite connection or transaction.
pub struct SqliteLedgerStore<'conn> {
    conn: &'conn Connection,
    tx_id: String,
}

impl<'conn> SqliteLedgerStore<'conn> {
    pub fn new(conn: &'conn Connection, tx_id: impl Into<String>) -> Self {
        Self {
            conn,
            tx_id: tx_id.into(),
        }
    }
}

impl LedgerStore for SqliteLedgerStore<'_> {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM ledger_state WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO ledger_state (key, value, tx_id)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                tx_id = excluded.tx_id,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value, self.tx_id],
        )?;
        self.conn.execute(
            "INSERT INTO ledger_history (key, tx_id, value) VALUES (?1, ?2, ?3);",
            params![key, self.tx_id, value],
        )?;
        Ok(())
    }

    fn delete_state(&self, key: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM ledger_state WHERE key = ?1;", [key])?;
        if changed == 0 {
            return Ok(());
        }

        self.conn.execute(
            "INSERT INTO ledger_history (key, tx_id, value) VALUES (?1, ?2, NULL);",
            params![key, self.tx_id],
        )?;
        Ok(())
    }

    fn history(&self, key: &str) -> StoreResult<HistoryIter<'_>> {
        Ok(Box::new(SqliteHistoryIter {
            conn: self.conn,
            key: key.to_string(),
            after_seq: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }))
    }
}

/// Pages through `ledger_history` by `seq` as the caller advances.
struct SqliteHistoryIter<'conn> {
    conn: &'conn Connection,
    key: String,
    after_seq: i64,
    buffer: VecDeque<HistoryEntry>,
    exhausted: bool,
}

impl SqliteHistoryIter<'_> {
    fn fetch_page(&mut self) -> StoreResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT seq, tx_id, value
             FROM ledger_history
             WHERE key = ?1 AND seq > ?2
             ORDER BY seq ASC
             LIMIT ?3;",
        )?;
        let mut rows = stmt.query(params![self.key, self.after_seq, HISTORY_PAGE_SIZE])?;

        let mut fetched = 0_u32;
        while let Some(row) = rows.next()? {
            self.after_seq = row.get(0)?;
            self.buffer.push_back(HistoryEntry {
                tx_id: row.get(1)?,
                value: row.get(2)?,
            });
            fetched += 1;
        }

        if fetched < HISTORY_PAGE_SIZE {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl Iterator for SqliteHistoryIter<'_> {
    type Item = StoreResult<HistoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(err) = self.fetch_page() {
                self.exhausted = true;
                self.buffer.clear();
                return Some(Err(err));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// Runs one ledger invocation inside a single SQLite transaction.
///
/// A fresh UUID v4 becomes the invocation tx id. The transaction commits
/// when `f` returns `Ok` and rolls back otherwise, so ownership writes from
/// a failed invocation never become visible.
pub fn run_in_transaction<T, E, F>(conn: &mut Connection, f: F) -> Result<T, E>
where
    F: FnOnce(&SqliteLedgerStore<'_>) -> Result<T, E>,
    E: From<StoreError>,
{
    let tx = conn.transaction().map_err(StoreError::from)?;
    let tx_id = Uuid::new_v4().to_string();

    let outcome = {
        let store = SqliteLedgerStore::new(&tx, tx_id.as_str());
        f(&store)
    };

    match outcome {
        Ok(value) => {
            tx.commit().map_err(StoreError::from)?;
            debug!("event=ledger_tx module=store status=commit tx_id={tx_id}");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=ledger_tx module=store status=error tx_id={tx_id} error_code=rollback_failed error={rollback_err}"
                );
            } else {
                debug!("event=ledger_tx module=store status=rollback tx_id={tx_id}");
            }
            Err(err)
        }
    }
}
