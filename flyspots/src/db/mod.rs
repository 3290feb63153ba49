//! Storage module for spots, reviews and the offline cache ledger.
//!
//! This module provides abstractions for storage via the Repository pattern:
//!
//! - `repository`: Trait definitions (`SpotRepository`, `ReviewRepository`, `LedgerStore`)
//! - `repositories::local`: In-memory snapshot store for spots and reviews
//! - `repositories::ledger`: Memory and JSON-file backends for the ledger
//! - `factory`: Builds stores from [`FlyspotsConfig`](crate::config::FlyspotsConfig)
//! - `services`: High-level operations (use these in your application!)
//! - `seed`: Built-in sample spots and reviews
//!
//! # Recommended Usage
//!
//! ```
//! use flyspots::config::FlyspotsConfig;
//! use flyspots::db::{services, RepositoryFactory};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FlyspotsConfig::default();
//! let repo = RepositoryFactory::from_config(&config)?;
//!
//! let spots = services::search_spots(repo.as_ref(), &config.initial_filter()).await?;
//! assert_eq!(spots.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod seed;
pub mod services;

pub use factory::RepositoryFactory;
pub use repositories::{FileLedgerStore, LocalRepository, MemoryLedgerStore};
pub use repository::{
    FullRepository, LedgerStore, RepositoryError, RepositoryResult, ReviewRepository,
    SpotRepository, SpotSnapshot,
};
