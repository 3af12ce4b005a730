pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod validate;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, LedgerError};
pub use ledger::{CalorieLedger, LedgerChange, LedgerEvent, LedgerObserver};
pub use models::{Entry, EntryKind, LedgerState};
pub use state::AppState;
pub use stats::Stats;
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistenceStore};
