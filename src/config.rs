// ⚙️ Runtime configuration from the environment
//
//   BUDGET_STORE    sqlite (default) | memory
//   BUDGET_DB_PATH  SQLite file, default budget.db
//   BUDGET_ADDR     listen address, default 0.0.0.0:8081

use crate::db::SqliteStore;
use crate::store::{LedgerStore, MemoryStore};
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "budget.db";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8081";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "durable" => Ok(StoreBackend::Sqlite),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown BUDGET_STORE '{}' (expected 'sqlite' or 'memory')", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("BUDGET_STORE") {
            Some(raw) => raw.parse()?,
            None => StoreBackend::Sqlite,
        };

        let db_path = get("BUDGET_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let raw_addr = get("BUDGET_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .with_context(|| format!("Invalid BUDGET_ADDR: {:?}", raw_addr))?;

        Ok(Config {
            backend,
            db_path,
            addr,
        })
    }

    /// Build the configured ledger store
    pub fn open_store(&self) -> Result<Arc<dyn LedgerStore>> {
        let store: Arc<dyn LedgerStore> = match self.backend {
            StoreBackend::Sqlite => {
                let store = SqliteStore::open(&self.db_path).with_context(|| {
                    format!("Failed to open ledger database at {:?}", self.db_path)
                })?;
                tracing::info!(path = %self.db_path.display(), "using sqlite ledger store");
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::info!("using in-memory ledger store (entries are lost on exit)");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(store)
    }
}
