// 🗄️ SQLite ledger store
//
// Single flat table, created on open if absent. Row ids come from
// AUTOINCREMENT so deleted ids are never handed out again.

use crate::ledger::{Kind, NewTransaction, Transaction};
use crate::store::{LedgerStore, StoreError, StoreResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the table exists
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // WAL for crash recovery; the pragma answers with the new mode
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "opened ledger database");

        Self::with_connection(conn)
    }

    /// Private database that disappears with the store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        setup_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Make the engine abort any insert with this category
    #[cfg(test)]
    pub(crate) fn refuse_category(&self, category: &str) {
        self.lock()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER refuse_category BEFORE INSERT ON transactions
                 WHEN NEW.category = '{}'
                 BEGIN SELECT RAISE(ABORT, 'refused'); END;",
                category.replace('\'', "''")
            ))
            .unwrap();
    }
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            amount REAL NOT NULL,
            category TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl LedgerStore for SqliteStore {
    fn append(&self, entry: NewTransaction) -> StoreResult<Transaction> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO transactions (kind, amount, category) VALUES (?1, ?2, ?3)",
            params![entry.kind().as_str(), entry.amount(), entry.category()],
        )?;

        Ok(entry.into_transaction(conn.last_insert_rowid()))
    }

    fn append_batch(&self, entries: Vec<NewTransaction>) -> StoreResult<Vec<Transaction>> {
        let mut conn = self.lock()?;

        // Dropping db_tx without commit rolls every insert back
        let db_tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(entries.len());
        {
            let mut stmt = db_tx.prepare(
                "INSERT INTO transactions (kind, amount, category) VALUES (?1, ?2, ?3)",
            )?;
            for entry in entries {
                let id = stmt.insert(params![entry.kind().as_str(), entry.amount(), entry.category()])?;
                stored.push(entry.into_transaction(id));
            }
        }
        db_tx.commit()?;

        Ok(stored)
    }

    fn list_all(&self) -> StoreResult<Vec<Transaction>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, kind, amount, category
             FROM transactions
             ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, kind, amount, category)| {
                let kind = kind.parse::<Kind>().map_err(|e| StoreError::CorruptRow {
                    id,
                    reason: e.to_string(),
                })?;

                Ok(Transaction {
                    id,
                    kind,
                    amount,
                    category,
                })
            })
            .collect()
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let conn = self.lock()?;

        let removed = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}
