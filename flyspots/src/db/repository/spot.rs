//! Spot store trait.
//!
//! The store publishes its contents as immutable snapshots: readers get an
//! `Arc` to the whole collection and never see a half-applied write. Writers
//! build the next snapshot and swap it in under the store's own lock.

use async_trait::async_trait;
use std::sync::Arc;

use super::error::RepositoryResult;
use crate::models::{Spot, SpotId};

/// Immutable view of every spot, newest contribution first.
pub type SpotSnapshot = Arc<Vec<Spot>>;

/// Repository trait for spot records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SpotRepository: Send + Sync {
    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Current snapshot of all spots.
    async fn snapshot(&self) -> RepositoryResult<SpotSnapshot>;

    /// Retrieve one spot.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no spot has this ID
    async fn get_spot(&self, spot_id: SpotId) -> RepositoryResult<Spot>;

    /// Reserve a fresh spot identity.
    ///
    /// IDs are unique but not dense: an ID reserved for a submission that is
    /// later rejected is never reused.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If every ID has been used
    async fn next_spot_id(&self) -> RepositoryResult<SpotId>;

    /// Add a spot in front of the collection.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If the ID is already taken
    async fn insert_spot(&self, spot: Spot) -> RepositoryResult<Spot>;

    async fn spot_count(&self) -> RepositoryResult<usize>;
}
