//! Repository factory for dependency injection.
//!
//! Builds the spot store and the ledger store from a [`FlyspotsConfig`].

use std::sync::Arc;

use super::repositories::{FileLedgerStore, LocalRepository, MemoryLedgerStore};
use super::repository::{FullRepository, LedgerStore, RepositoryResult};
use crate::config::{FlyspotsConfig, LedgerBackend, RepositoryType};
use crate::services::offline::CacheLedger;

/// Repository factory for creating store instances.
///
/// # Example
/// ```
/// use flyspots::config::FlyspotsConfig;
/// use flyspots::db::{RepositoryFactory, SpotRepository};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FlyspotsConfig::default();
/// let repo = RepositoryFactory::from_config(&config)?;
/// assert!(repo.health_check().await?);
/// # Ok(())
/// # }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a spot store of the given type, seeded with the sample spots.
    pub fn create(repo_type: RepositoryType) -> Arc<dyn FullRepository> {
        match repo_type {
            RepositoryType::Local => Self::create_local(),
        }
    }

    /// In-memory store holding the built-in sample spots and reviews.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::with_sample_data())
    }

    /// In-memory store with no data.
    pub fn create_empty() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    pub fn from_config(config: &FlyspotsConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type()?;
        log::info!("Creating {:?} spot repository", repo_type);
        Ok(Self::create(repo_type))
    }

    /// Create the ledger storage backend named by the configuration.
    ///
    /// `FLYSPOTS_LEDGER` overrides the backend set in the file.
    pub fn create_ledger(config: &FlyspotsConfig) -> RepositoryResult<Arc<dyn LedgerStore>> {
        Ok(Self::create_ledger_backend(config.ledger_backend()?, config))
    }

    /// Ledger storage for an already resolved backend.
    pub fn create_ledger_backend(
        backend: LedgerBackend,
        config: &FlyspotsConfig,
    ) -> Arc<dyn LedgerStore> {
        match backend {
            LedgerBackend::Memory => Arc::new(MemoryLedgerStore::new()),
            LedgerBackend::File => {
                log::info!("Using ledger file {}", config.ledger.path.display());
                Arc::new(FileLedgerStore::new(config.ledger.path.clone()))
            }
        }
    }

    /// Typed cache ledger over the configured backend and key prefix.
    pub fn create_cache_ledger(config: &FlyspotsConfig) -> RepositoryResult<CacheLedger> {
        let store = Self::create_ledger(config)?;
        Ok(CacheLedger::new(store, config.ledger.key_prefix.clone()))
    }
}
