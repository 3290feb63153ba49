//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the spot and review
//! repository traits, suitable for unit testing, local development and the
//! single-device app itself. Collections are held as `Arc<Vec<_>>` snapshots:
//! a write clones the collection only if a reader still holds the old one, then
//! publishes the result while holding the write lock.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::db::seed;
use crate::models::{Review, ReviewId, Spot, SpotId};

/// In-memory local repository.
///
/// # Example
/// ```
/// use flyspots::db::repositories::LocalRepository;
/// use flyspots::db::SpotRepository;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = LocalRepository::with_sample_data();
/// let spots = repo.snapshot().await.unwrap();
/// assert_eq!(spots.len(), 3);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    spots: Arc<Vec<Spot>>,
    /// Newest first, all spots mixed.
    reviews: Arc<Vec<Review>>,

    // ID counters
    next_spot_id: u64,
    next_review_id: u64,

    // Connection health
    is_healthy: bool,
}

/// First ID after `largest`. Saturates at `u64::MAX`, which is never handed out.
fn next_after(largest: Option<u64>) -> u64 {
    largest.map_or(1, |id| id.saturating_add(1))
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            spots: Arc::new(Vec::new()),
            reviews: Arc::new(Vec::new()),
            next_spot_id: 1,
            next_review_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository holding `spots` and `reviews`.
    ///
    /// ID counters start after the largest ID present.
    pub fn with_data(spots: Vec<Spot>, reviews: Vec<Review>) -> Self {
        let next_spot_id = next_after(spots.iter().map(|s| s.id.value()).max());
        let next_review_id = next_after(reviews.iter().map(|r| r.id.value()).max());
        Self {
            data: Arc::new(RwLock::new(LocalData {
                spots: Arc::new(spots),
                reviews: Arc::new(reviews),
                next_spot_id,
                next_review_id,
                is_healthy: true,
            })),
        }
    }

    /// Repository pre-loaded with the built-in sample spots and reviews.
    pub fn with_sample_data() -> Self {
        Self::with_data(seed::sample_spots(), seed::sample_reviews())
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Spot store is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `update` to one review and return the updated copy.
    fn update_review(
        &self,
        review_id: ReviewId,
        update: impl FnOnce(&mut Review),
    ) -> RepositoryResult<Review> {
        self.check_health()?;
        let mut data = self.data.write();
        let position = data
            .reviews
            .iter()
            .position(|r| r.id == review_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Review {} not found", review_id)))?;

        let reviews = Arc::make_mut(&mut data.reviews);
        update(&mut reviews[position]);
        Ok(reviews[position].clone())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn snapshot(&self) -> RepositoryResult<SpotSnapshot> {
        self.check_health()?;
        Ok(Arc::clone(&self.data.read().spots))
    }

    async fn get_spot(&self, spot_id: SpotId) -> RepositoryResult<Spot> {
        self.check_health()?;
        self.data
            .read()
            .spots
            .iter()
            .find(|s| s.id == spot_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Spot {} not found", spot_id)))
    }

    async fn next_spot_id(&self) -> RepositoryResult<SpotId> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = SpotId(data.next_spot_id);
        data.next_spot_id = id
            .checked_next()
            .ok_or_else(|| RepositoryError::Conflict("Spot ID space exhausted".to_string()))?
            .value();
        Ok(id)
    }

    async fn insert_spot(&self, spot: Spot) -> RepositoryResult<Spot> {
        self.check_health()?;
        let mut data = self.data.write();
        if data.spots.iter().any(|s| s.id == spot.id) {
            return Err(RepositoryError::Conflict(format!(
                "Spot {} already exists",
                spot.id
            )));
        }

        data.next_spot_id = data.next_spot_id.max(next_after(Some(spot.id.value())));
        Arc::make_mut(&mut data.spots).insert(0, spot.clone());
        Ok(spot)
    }

    async fn spot_count(&self) -> RepositoryResult<usize> {
        self.check_health()?;
        Ok(self.data.read().spots.len())
    }
}

#[async_trait]
impl ReviewRepository for LocalRepository {
    async fn next_review_id(&self) -> RepositoryResult<ReviewId> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = ReviewId(data.next_review_id);
        data.next_review_id = id
            .checked_next()
            .ok_or_else(|| RepositoryError::Conflict("Review ID space exhausted".to_string()))?
            .value();
        Ok(id)
    }

    async fn add_review(&self, review: Review) -> RepositoryResult<Review> {
        self.check_health()?;
        let mut data = self.data.write();

        let position = data
            .spots
            .iter()
            .position(|s| s.id == review.spot_id)
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Spot {} not found", review.spot_id))
            })?;
        if data.reviews.iter().any(|r| r.id == review.id) {
            return Err(RepositoryError::Conflict(format!(
                "Review {} already exists",
                review.id
            )));
        }

        data.next_review_id = data.next_review_id.max(next_after(Some(review.id.value())));
        let spot = &mut Arc::make_mut(&mut data.spots)[position];
        spot.review_count = spot.review_count.saturating_add(1);
        Arc::make_mut(&mut data.reviews).insert(0, review.clone());
        Ok(review)
    }

    async fn reviews_for_spot(&self, spot_id: SpotId) -> RepositoryResult<Vec<Review>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .reviews
            .iter()
            .filter(|r| r.spot_id == spot_id)
            .cloned()
            .collect())
    }

    async fn like_review(&self, review_id: ReviewId) -> RepositoryResult<Review> {
        self.update_review(review_id, |review| review.likes = review.likes.saturating_add(1))
    }

    async fn report_review(&self, review_id: ReviewId) -> RepositoryResult<Review> {
        self.update_review(review_id, |review| review.reports = review.reports.saturating_add(1))
    }
}
