use super::{LedgerStore, StoreError, StoreResult};
use crate::ledger::{NewTransaction, Transaction};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Ledger {
    next_id: i64,
    rows: Vec<Transaction>,
}

/// In-process ledger. Contents are lost when the process exits.
#[derive(Debug)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Ledger>> {
        self.ledger.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn append(&self, entry: NewTransaction) -> StoreResult<Transaction> {
        let mut ledger = self.lock()?;

        let id = ledger.next_id;
        ledger.next_id += 1;

        let tx = entry.into_transaction(id);
        ledger.rows.push(tx.clone());

        Ok(tx)
    }

    fn append_batch(&self, entries: Vec<NewTransaction>) -> StoreResult<Vec<Transaction>> {
        // One lock for the whole batch, so no reader sees half of it
        let mut ledger = self.lock()?;

        let stored: Vec<Transaction> = entries
            .into_iter()
            .zip(ledger.next_id..)
            .map(|(entry, id)| entry.into_transaction(id))
            .collect();

        ledger.next_id += stored.len() as i64;
        ledger.rows.extend(stored.iter().cloned());

        Ok(stored)
    }

    fn list_all(&self) -> StoreResult<Vec<Transaction>> {
        // Rows are pushed with increasing ids, so insertion order is id order
        Ok(self.lock()?.rows.clone())
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let mut ledger = self.lock()?;

        let pos = ledger
            .rows
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(StoreError::NotFound(id))?;
        ledger.rows.remove(pos);

        Ok(())
    }
}
