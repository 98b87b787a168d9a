// Ledger stores
//
// One capability, two implementations:
// - MemoryStore: mutex-guarded Vec, lives as long as the process
// - SqliteStore (crate::db): single `transactions` table on disk

pub mod memory;

pub use memory::MemoryStore;

use crate::ledger::{NewTransaction, Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append/scan/delete access to the ledger.
///
/// Implementations are shared across request handlers, so they carry their
/// own synchronization.
pub trait LedgerStore: Send + Sync {
    /// Assign the next id, persist the entry and return it as stored
    fn append(&self, entry: NewTransaction) -> StoreResult<Transaction>;

    /// Append every entry or none of them
    fn append_batch(&self, entries: Vec<NewTransaction>) -> StoreResult<Vec<Transaction>>;

    /// Every transaction, ordered by id ascending
    fn list_all(&self) -> StoreResult<Vec<Transaction>>;

    /// Remove one transaction; unknown ids are `StoreError::NotFound`
    fn delete(&self, id: i64) -> StoreResult<()>;
}
