//! Key-value storage behind the offline cache ledger.
//!
//! Values are opaque strings; the ledger layer decides what they contain.
//! Writes replace the whole value for a key.

use async_trait::async_trait;

use super::error::RepositoryResult;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Raw value for `key`, or `None` if it was never written or was removed.
    async fn read(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Overwrite the value stored under `key`.
    async fn write(&self, key: &str, value: String) -> RepositoryResult<()>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> RepositoryResult<()>;
}
