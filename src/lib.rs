// Budget Ledger - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod db;
pub mod import;
pub mod ledger;
pub mod logging;
pub mod store;
pub mod summary;

// Only compile the HTTP layer when the server feature is enabled
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{Config, StoreBackend};
pub use db::SqliteStore;
pub use import::{import_entries, load_csv, load_csv_from_reader};
pub use ledger::{Kind, LedgerError, NewTransaction, Transaction};
pub use store::{LedgerStore, MemoryStore, StoreError, StoreResult};
pub use summary::{summarize, Summary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
