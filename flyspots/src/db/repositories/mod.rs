//! Repository implementations module.
//!
//! - `local`: In-memory spot and review store
//! - `ledger`: Storage backends for the offline cache ledger

pub mod ledger;
pub mod local;

pub use ledger::{FileLedgerStore, MemoryLedgerStore};
pub use local::LocalRepository;
