//! Reviews left on spots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SpotId;

crate::define_id_type! {
    /// Identifier of a review.
    ReviewId
}

/// Whole-star rating in 1..=5.
///
/// The only way to build one is through [`StarRating::new`] (or `TryFrom<u8>`),
/// so anything holding a `StarRating` is already inside the histogram range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StarRating::new(value).ok_or_else(|| format!("star rating must be 1-5, got {}", value))
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

/// A single review. Stored flat and keyed by `spot_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub spot_id: SpotId,
    pub author: String,
    pub rating: StarRating,
    pub comment: String,
    pub date: NaiveDate,
    pub likes: u32,
    #[serde(default)]
    pub reports: u32,
    pub photo_count: u32,
    pub video_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_rating_bounds() {
        assert!(StarRating::new(0).is_none());
        assert_eq!(StarRating::new(1).map(StarRating::get), Some(1));
        assert_eq!(StarRating::new(5).map(StarRating::get), Some(5));
        assert!(StarRating::new(6).is_none());
    }

    #[test]
    fn test_star_rating_rejected_on_deserialize() {
        assert!(serde_json::from_str::<StarRating>("4").is_ok());
        assert!(serde_json::from_str::<StarRating>("0").is_err());
        assert!(serde_json::from_str::<StarRating>("9").is_err());
    }

    #[test]
    fn test_review_id_wire_shape_and_successor() {
        let id: ReviewId = serde_json::from_str("12").unwrap();
        assert_eq!(id, ReviewId::new(12));
        assert_eq!(id.to_string(), "12");
        assert_eq!(u64::from(id), 12);
        assert_eq!(id.checked_next(), Some(ReviewId(13)));
        assert_eq!(ReviewId(u64::MAX).checked_next(), None);
    }
}
