//! Review store trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Review, ReviewId, SpotId};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reserve a fresh review identity.
    ///
    /// # Returns
    /// * `Err(RepositoryError::Conflict)` - If every ID has been used
    async fn next_review_id(&self) -> RepositoryResult<ReviewId>;

    /// Store a review and bump the owning spot's `review_count`.
    ///
    /// Both changes become visible together.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If `review.spot_id` does not exist
    async fn add_review(&self, review: Review) -> RepositoryResult<Review>;

    /// Reviews of one spot, newest first.
    async fn reviews_for_spot(&self, spot_id: SpotId) -> RepositoryResult<Vec<Review>>;

    /// Increment the like counter of a review.
    async fn like_review(&self, review_id: ReviewId) -> RepositoryResult<Review>;

    /// Increment the report counter of a review.
    async fn report_review(&self, review_id: ReviewId) -> RepositoryResult<Review>;
}
