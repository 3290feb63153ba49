//! High-level store service layer.
//!
//! Repository-agnostic operations that tie the pure engines (filtering,
//! validation, statistics) to store reads and writes. Functions take any
//! implementation of the repository traits, including `dyn FullRepository`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (UI shell, import tools, ...)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Filtering over the current snapshot                  │
//! │  - Validation before every write                        │
//! │  - Review statistics                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - SpotRepository, ReviewRepository, LedgerStore        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Local Repository (in-memory snapshots)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use flyspots::db::{services, repositories::LocalRepository};
//! use flyspots::transformations::SpotFilter;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = LocalRepository::with_sample_data();
//! let spots = services::search_spots(&repo, &SpotFilter::default().with_min_rating(4.5)).await?;
//! assert_eq!(spots.len(), 2);
//! # Ok(())
//! # }
//! ```

use chrono::{Local, NaiveDate};
use log::{info, warn};

use super::repository::{
    FullRepository, RepositoryResult, ReviewRepository, SpotRepository, SpotSnapshot,
};
use crate::models::{Coordinates, LegacySpotRecord, Review, ReviewId, Spot, SpotId};
use crate::services::distributions::{summarize_ratings, summarize_spots, RatingSummary, SpotStats};
use crate::services::geo::with_distances_from;
use crate::services::validation::{
    validate_contribution, validate_review, ContributionDraft, ReviewDraft,
};
use crate::transformations::{filter_spots, preview, FilterPreview, SpotFilter};

/// Number of spots shown in the filter preview panel.
pub const PREVIEW_LIMIT: usize = 3;

// ==================== Health ====================

pub async fn health_check<R: SpotRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Spot Queries ====================

/// Current snapshot of every spot, newest contribution first.
pub async fn list_spots<R: SpotRepository + ?Sized>(repo: &R) -> RepositoryResult<SpotSnapshot> {
    repo.snapshot().await
}

/// Spots matching `filter`, in store order.
pub async fn search_spots<R: SpotRepository + ?Sized>(
    repo: &R,
    filter: &SpotFilter,
) -> RepositoryResult<Vec<Spot>> {
    let snapshot = repo.snapshot().await?;
    Ok(filter_spots(&snapshot, filter))
}

/// Spots matching `filter` with distances measured from `reference`.
pub async fn search_spots_near<R: SpotRepository + ?Sized>(
    repo: &R,
    filter: &SpotFilter,
    reference: Coordinates,
) -> RepositoryResult<Vec<Spot>> {
    let snapshot = repo.snapshot().await?;
    let measured = with_distances_from(&snapshot, reference);
    Ok(filter_spots(&measured, filter))
}

/// "N of M spots match" preview with the first [`PREVIEW_LIMIT`] matches.
pub async fn spot_preview<R: SpotRepository + ?Sized>(
    repo: &R,
    filter: &SpotFilter,
) -> RepositoryResult<FilterPreview> {
    let snapshot = repo.snapshot().await?;
    Ok(preview(&snapshot, filter, PREVIEW_LIMIT))
}

pub async fn spot_stats<R: SpotRepository + ?Sized>(repo: &R) -> RepositoryResult<SpotStats> {
    let snapshot = repo.snapshot().await?;
    Ok(summarize_spots(&snapshot))
}

// ==================== Contributions ====================

/// Validate a new-spot submission and add it to the front of the store.
///
/// A rejected draft leaves the store contents unchanged.
///
/// # Returns
/// * `Err(RepositoryError::ValidationError)` - listing every offending field
pub async fn submit_contribution<R: SpotRepository + ?Sized>(
    repo: &R,
    draft: &ContributionDraft,
    default_location: Coordinates,
) -> RepositoryResult<Spot> {
    let id = repo.next_spot_id().await?;
    let spot = match validate_contribution(draft, id, default_location) {
        Ok(spot) => spot,
        Err(e) => {
            warn!("Rejected spot contribution: {}", e);
            return Err(e.into());
        }
    };

    let spot = repo.insert_spot(spot).await?;
    info!("Added spot {} ({})", spot.id, spot.name);
    Ok(spot)
}

// ==================== Reviews ====================

/// Validate and store a review dated today.
pub async fn submit_review<R: FullRepository + ?Sized>(
    repo: &R,
    spot_id: SpotId,
    draft: &ReviewDraft,
) -> RepositoryResult<Review> {
    submit_review_on(repo, spot_id, draft, Local::now().date_naive()).await
}

/// Validate and store a review with an explicit date.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` - if the spot does not exist
/// * `Err(RepositoryError::ValidationError)` - listing every offending field
pub async fn submit_review_on<R: FullRepository + ?Sized>(
    repo: &R,
    spot_id: SpotId,
    draft: &ReviewDraft,
    date: NaiveDate,
) -> RepositoryResult<Review> {
    repo.get_spot(spot_id).await?;

    let id = repo.next_review_id().await?;
    let review = match validate_review(draft, id, spot_id, date) {
        Ok(review) => review,
        Err(e) => {
            warn!("Rejected review for spot {}: {}", spot_id, e);
            return Err(e.into());
        }
    };

    let review = repo.add_review(review).await?;
    info!("Added review {} for spot {}", review.id, spot_id);
    Ok(review)
}

pub async fn reviews_for_spot<R: ReviewRepository + ?Sized>(
    repo: &R,
    spot_id: SpotId,
) -> RepositoryResult<Vec<Review>> {
    repo.reviews_for_spot(spot_id).await
}

/// Average and star histogram over the reviews of one spot.
pub async fn rating_summary<R: ReviewRepository + ?Sized>(
    repo: &R,
    spot_id: SpotId,
) -> RepositoryResult<RatingSummary> {
    let reviews = repo.reviews_for_spot(spot_id).await?;
    Ok(summarize_ratings(&reviews))
}

pub async fn like_review<R: ReviewRepository + ?Sized>(
    repo: &R,
    review_id: ReviewId,
) -> RepositoryResult<Review> {
    repo.like_review(review_id).await
}

pub async fn report_review<R: ReviewRepository + ?Sized>(
    repo: &R,
    review_id: ReviewId,
) -> RepositoryResult<Review> {
    let review = repo.report_review(review_id).await?;
    info!("Review {} reported ({} reports)", review.id, review.reports);
    Ok(review)
}

// ==================== Import ====================

/// Convert legacy records, dropping any that cannot be parsed.
///
/// Records with an unreadable distance label or unknown category are logged
/// and skipped rather than imported with a guessed value.
pub fn import_legacy_spots(records: Vec<LegacySpotRecord>) -> Vec<Spot> {
    let total = records.len();
    let spots: Vec<Spot> = records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Spot::try_from(record) {
                Ok(spot) => Some(spot),
                Err(e) => {
                    warn!("Skipping legacy spot {}: {}", id, e);
                    None
                }
            }
        })
        .collect();

    if spots.len() < total {
        warn!("Imported {} of {} legacy spots", spots.len(), total);
    } else {
        info!("Imported {} legacy spots", total);
    }
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RepositoryError;
    use crate::services::validation::Field;

    fn reference() -> Coordinates {
        Coordinates::new(32.0853, 34.7818)
    }

    #[tokio::test]
    async fn test_search_spots_applies_filter() {
        let repo = LocalRepository::with_sample_data();
        let filter = SpotFilter::default().with_search("beach");
        let spots = search_spots(&repo, &filter).await.unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].id, SpotId(2));
    }

    #[tokio::test]
    async fn test_search_spots_near_recomputes_distance() {
        let repo = LocalRepository::with_sample_data();
        let filter = SpotFilter::default().with_max_distance_km(10.0);
        let spots = search_spots_near(&repo, &filter, reference()).await.unwrap();
        let ids: Vec<SpotId> = spots.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SpotId(2), SpotId(3)]);
        assert!(spots[0].distance_km < 0.001);
    }

    #[tokio::test]
    async fn test_spot_preview() {
        let repo = LocalRepository::with_sample_data();
        let preview = spot_preview(&repo, &SpotFilter::default()).await.unwrap();
        assert_eq!(preview.matched, 3);
        assert_eq!(preview.total, 3);
        assert_eq!(preview.top.len(), 3);
        assert_eq!(preview.remaining, 0);
    }

    #[tokio::test]
    async fn test_submit_contribution_prepends() {
        let repo = LocalRepository::with_sample_data();
        let draft = ContributionDraft {
            name: "Dunes".to_string(),
            description: "Sand".to_string(),
            landscape_type: "desert".to_string(),
            difficulty: "beginner".to_string(),
            ..Default::default()
        };

        let spot = submit_contribution(&repo, &draft, reference()).await.unwrap();
        assert_eq!(spot.id, SpotId(4));
        assert_eq!(spot.coordinates, reference());

        let snapshot = list_spots(&repo).await.unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].id, SpotId(4));
    }

    #[tokio::test]
    async fn test_rejected_contribution_leaves_store_unchanged() {
        let repo = LocalRepository::with_sample_data();
        let before = list_spots(&repo).await.unwrap();
        let draft = ContributionDraft {
            description: "No name".to_string(),
            landscape_type: "forest".to_string(),
            difficulty: "expert".to_string(),
            ..Default::default()
        };

        let err = submit_contribution(&repo, &draft, reference()).await.unwrap_err();
        match err {
            RepositoryError::ValidationError(e) => assert!(e.has_field(Field::Name)),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(list_spots(&repo).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_submit_review_updates_summary() {
        let repo = LocalRepository::with_sample_data();
        let draft = ReviewDraft {
            rating: 1,
            comment: "Too windy".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();

        let review = submit_review_on(&repo, SpotId(2), &draft, date).await.unwrap();
        assert_eq!(review.author, "CurrentUser");
        assert_eq!(review.likes, 0);

        let reviews = reviews_for_spot(&repo, SpotId(2)).await.unwrap();
        assert_eq!(reviews[0].id, review.id);

        let summary = rating_summary(&repo, SpotId(2)).await.unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.histogram[&1], 1);
        assert_eq!(repo.get_spot(SpotId(2)).await.unwrap().review_count, 24);
    }

    #[tokio::test]
    async fn test_submit_review_for_missing_spot() {
        let repo = LocalRepository::with_sample_data();
        let draft = ReviewDraft {
            rating: 5,
            comment: "Great".to_string(),
            ..Default::default()
        };
        let err = submit_review(&repo, SpotId(99), &draft).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_like_and_report_review() {
        let repo = LocalRepository::with_sample_data();
        let review = reviews_for_spot(&repo, SpotId(2)).await.unwrap()[0].clone();

        let liked = like_review(&repo, review.id).await.unwrap();
        assert_eq!(liked.likes, review.likes + 1);
        let reported = report_review(&repo, review.id).await.unwrap();
        assert_eq!(reported.reports, 1);
    }

    #[tokio::test]
    async fn test_services_work_through_trait_objects() {
        let repo: std::sync::Arc<dyn FullRepository> =
            std::sync::Arc::new(LocalRepository::with_sample_data());
        assert!(health_check(repo.as_ref()).await.unwrap());
        let stats = spot_stats(repo.as_ref()).await.unwrap();
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_import_legacy_spots_drops_bad_records() {
        let records: Vec<LegacySpotRecord> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Ridge", "type": "mountain", "rating": 4.0,
                 "distance": "2.5 km", "difficulty": "Expert",
                 "coordinates": {"lat": 32.7, "lng": 34.9}},
                {"id": 2, "name": "Shore", "type": "coastal", "rating": 4.1,
                 "distance": "far away", "difficulty": "beginner",
                 "coordinates": {"lat": 32.0, "lng": 34.7}},
                {"id": 3, "name": "Hills", "type": "volcano", "rating": 3.0,
                 "distance": "1 km", "difficulty": "beginner",
                 "coordinates": {"lat": 31.0, "lng": 34.0}},
                {"id": 4, "name": "Overrated", "type": "urban", "rating": 9.0,
                 "distance": "3 km", "difficulty": "beginner",
                 "coordinates": {"lat": 32.1, "lng": 34.8}},
                {"id": 5, "name": "Nowhere", "type": "desert", "rating": 3.5,
                 "distance": "4 km", "difficulty": "intermediate",
                 "coordinates": {"lat": 200.0, "lng": 500.0}}
            ]"#,
        )
        .unwrap();

        let spots = import_legacy_spots(records);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].id.value(), 1);
        assert_eq!(spots[0].distance_km, 2.5);
    }
}
