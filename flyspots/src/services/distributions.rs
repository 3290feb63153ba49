//! Derived statistics over spots and reviews.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{LandscapeType, Review, Spot, StarRating};

/// Round to one decimal place, the precision ratings are shown at.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average rating and star histogram of a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean star rating rounded to one decimal; 0 for no reviews.
    pub average: f64,
    /// Always holds exactly the keys 1 through 5.
    pub histogram: BTreeMap<u8, u32>,
    pub count: usize,
}

impl RatingSummary {
    /// Share of reviews with `stars`, in percent. 0 when there are no reviews.
    pub fn share_percent(&self, stars: u8) -> f64 {
        let bucket = self.histogram.get(&stars).copied().unwrap_or(0);
        cache_progress(bucket as usize, self.count)
    }
}

fn empty_histogram() -> BTreeMap<u8, u32> {
    (StarRating::MIN..=StarRating::MAX).map(|stars| (stars, 0)).collect()
}

/// Summarize review ratings.
///
/// Ratings are [`StarRating`]s, so every review lands in one of the five buckets;
/// out-of-range values were already refused when the review was built.
pub fn summarize_ratings(reviews: &[Review]) -> RatingSummary {
    let mut histogram = empty_histogram();
    if reviews.is_empty() {
        return RatingSummary {
            average: 0.0,
            histogram,
            count: 0,
        };
    }

    let mut sum = 0u64;
    for review in reviews {
        let stars = review.rating.get();
        sum += u64::from(stars);
        *histogram.entry(stars).or_insert(0) += 1;
    }

    RatingSummary {
        average: round_to_tenth(sum as f64 / reviews.len() as f64),
        histogram,
        count: reviews.len(),
    }
}

/// Percentage of `total_count` that is cached.
///
/// Returns 0 when `total_count` is 0. The ratio is not clamped: a result above
/// 100 means the ledger holds more entries than the store knows about, and the
/// caller should treat it as an integrity problem.
pub fn cache_progress(cached_count: usize, total_count: usize) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    cached_count as f64 / total_count as f64 * 100.0
}

/// Overview numbers for a spot collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotStats {
    pub count: usize,
    /// Mean spot rating rounded to one decimal; 0 for an empty collection.
    pub average_rating: f64,
    pub total_reviews: u64,
    pub total_photos: u64,
    pub total_videos: u64,
    pub by_landscape: BTreeMap<LandscapeType, usize>,
}

pub fn summarize_spots(spots: &[Spot]) -> SpotStats {
    let mut by_landscape = BTreeMap::new();
    let mut rating_sum = 0.0;
    let mut total_reviews = 0u64;
    let mut total_photos = 0u64;
    let mut total_videos = 0u64;

    for spot in spots {
        *by_landscape.entry(spot.landscape_type).or_insert(0) += 1;
        rating_sum += spot.rating;
        total_reviews += u64::from(spot.review_count);
        total_photos += u64::from(spot.photo_count);
        total_videos += u64::from(spot.video_count);
    }

    let average_rating = if spots.is_empty() {
        0.0
    } else {
        round_to_tenth(rating_sum / spots.len() as f64)
    };

    SpotStats {
        count: spots.len(),
        average_rating,
        total_reviews,
        total_photos,
        total_videos,
        by_landscape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Difficulty, ReviewId, SpotId};
    use chrono::NaiveDate;

    fn review(id: u64, stars: u8) -> Review {
        Review {
            id: ReviewId(id),
            spot_id: SpotId(1),
            author: "FPVPilot_Alex".to_string(),
            rating: StarRating::new(stars).unwrap(),
            comment: "Great spot".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            likes: 0,
            reports: 0,
            photo_count: 0,
            video_count: 0,
            tags: vec![],
        }
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_ratings(&[]);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.count, 0);
        assert_eq!(
            summary.histogram,
            BTreeMap::from([(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)])
        );
    }

    #[test]
    fn test_summarize_ratings() {
        let reviews: Vec<Review> = [5, 4, 4, 3]
            .into_iter()
            .enumerate()
            .map(|(i, stars)| review(i as u64, stars))
            .collect();

        let summary = summarize_ratings(&reviews);
        assert_eq!(summary.average, 4.0);
        assert_eq!(
            summary.histogram,
            BTreeMap::from([(1, 0), (2, 0), (3, 1), (4, 2), (5, 1)])
        );
        assert_eq!(summary.share_percent(4), 50.0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let reviews = vec![review(1, 5), review(2, 4), review(3, 4)];
        // 13 / 3 = 4.333...
        assert_eq!(summarize_ratings(&reviews).average, 4.3);

        let reviews = vec![review(1, 5), review(2, 5), review(3, 4)];
        // 14 / 3 = 4.666...
        assert_eq!(summarize_ratings(&reviews).average, 4.7);
    }

    #[test]
    fn test_cache_progress() {
        assert_eq!(cache_progress(0, 0), 0.0);
        assert_eq!(cache_progress(3, 5), 60.0);
        assert_eq!(cache_progress(5, 5), 100.0);
        assert_eq!(cache_progress(7, 0), 0.0);
    }

    #[test]
    fn test_cache_progress_is_not_clamped() {
        assert_eq!(cache_progress(10, 5), 200.0);
    }

    #[test]
    fn test_summarize_spots() {
        let make = |id: u64, landscape_type, rating, photos, videos| Spot {
            id: SpotId(id),
            name: format!("Spot {}", id),
            landscape_type,
            rating,
            distance_km: 1.0,
            difficulty: Difficulty::Beginner,
            description: String::new(),
            restrictions: String::new(),
            coordinates: Coordinates::new(32.0, 34.0),
            review_count: 2,
            photo_count: photos,
            video_count: videos,
            tags: vec![],
        };

        let spots = vec![
            make(1, LandscapeType::Mountain, 4.8, 8, 3),
            make(2, LandscapeType::Coastal, 4.2, 12, 5),
            make(3, LandscapeType::Mountain, 4.5, 6, 4),
        ];

        let stats = summarize_spots(&spots);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.total_reviews, 6);
        assert_eq!(stats.total_photos, 26);
        assert_eq!(stats.total_videos, 12);
        assert_eq!(stats.by_landscape[&LandscapeType::Mountain], 2);
        assert_eq!(stats.by_landscape[&LandscapeType::Coastal], 1);

        let empty = summarize_spots(&[]);
        assert_eq!(empty.average_rating, 0.0);
        assert!(empty.by_landscape.is_empty());
    }
}
