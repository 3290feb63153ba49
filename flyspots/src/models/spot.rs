//! Spot records and their closed category sets.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Coordinates, ParseError};

crate::define_id_type! {
    /// Identifier of a spot.
    SpotId
}

/// Terrain category of a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LandscapeType {
    Mountain,
    Coastal,
    Urban,
    Forest,
    Desert,
    River,
    Valley,
    Lake,
}

impl LandscapeType {
    pub const ALL: [LandscapeType; 8] = [
        LandscapeType::Mountain,
        LandscapeType::Coastal,
        LandscapeType::Urban,
        LandscapeType::Forest,
        LandscapeType::Desert,
        LandscapeType::River,
        LandscapeType::Valley,
        LandscapeType::Lake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandscapeType::Mountain => "Mountain",
            LandscapeType::Coastal => "Coastal",
            LandscapeType::Urban => "Urban",
            LandscapeType::Forest => "Forest",
            LandscapeType::Desert => "Desert",
            LandscapeType::River => "River",
            LandscapeType::Valley => "Valley",
            LandscapeType::Lake => "Lake",
        }
    }
}

impl FromStr for LandscapeType {
    type Err = ParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownLandscapeType(s.to_string()))
    }
}

impl std::fmt::Display for LandscapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pilot skill level a spot calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Expert => "Expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseError::UnknownDifficulty(s.to_string()))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate flying location.
///
/// `rating` lies in [0, 5], `distance_km` is non-negative and measured from the
/// viewer's reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub landscape_type: LandscapeType,
    pub rating: f64,
    pub distance_km: f64,
    pub difficulty: Difficulty,
    pub description: String,
    pub restrictions: String,
    pub coordinates: Coordinates,
    pub review_count: u32,
    pub photo_count: u32,
    pub video_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Spot {
    /// Number of media items (photos + videos) attached to the spot.
    pub fn media_count(&self) -> u64 {
        u64::from(self.photo_count) + u64::from(self.video_count)
    }
}

/// Parse a legacy `"2.5 km"` distance label into kilometres.
///
/// The unit suffix is optional and matched case-insensitively. Negative or
/// non-finite values are rejected.
pub fn parse_distance_label(label: &str) -> Result<f64, ParseError> {
    let trimmed = label.trim();
    let number = match trimmed.len().checked_sub(2) {
        Some(split) if trimmed.is_char_boundary(split)
            && trimmed[split..].eq_ignore_ascii_case("km") =>
        {
            trimmed[..split].trim_end()
        }
        _ => trimmed,
    };

    match number.parse::<f64>() {
        Ok(km) if km.is_finite() && km >= 0.0 => Ok(km),
        _ => Err(ParseError::MalformedDistance(label.to_string())),
    }
}

/// Spot shape used by older exports, with text distance and category labels.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySpotRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub landscape_type: String,
    pub rating: f64,
    pub distance: String,
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub restrictions: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub photos: u32,
    #[serde(default)]
    pub videos: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<LegacySpotRecord> for Spot {
    type Error = ParseError;

    /// Records outside the spot invariants are refused, never coerced.
    fn try_from(record: LegacySpotRecord) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&record.rating) {
            return Err(ParseError::RatingOutOfRange(record.rating));
        }
        if !record.coordinates.is_valid() {
            return Err(ParseError::InvalidCoordinates(record.coordinates));
        }

        Ok(Spot {
            id: SpotId(record.id),
            name: record.name,
            landscape_type: record.landscape_type.parse()?,
            rating: record.rating,
            distance_km: parse_distance_label(&record.distance)?,
            difficulty: record.difficulty.parse()?,
            description: record.description,
            restrictions: record.restrictions,
            coordinates: record.coordinates,
            review_count: record.reviews,
            photo_count: record.photos,
            video_count: record.videos,
            tags: record.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_type_parse_is_case_insensitive() {
        assert_eq!("mountain".parse::<LandscapeType>().unwrap(), LandscapeType::Mountain);
        assert_eq!("COASTAL".parse::<LandscapeType>().unwrap(), LandscapeType::Coastal);
        assert_eq!(" Lake ".parse::<LandscapeType>().unwrap(), LandscapeType::Lake);
        assert!(matches!(
            "volcano".parse::<LandscapeType>(),
            Err(ParseError::UnknownLandscapeType(_))
        ));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert_eq!("Intermediate".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert!("pro".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_parse_distance_label() {
        assert_eq!(parse_distance_label("2.5 km").unwrap(), 2.5);
        assert_eq!(parse_distance_label("0.0 km").unwrap(), 0.0);
        assert_eq!(parse_distance_label("12KM").unwrap(), 12.0);
        assert_eq!(parse_distance_label("7").unwrap(), 7.0);
    }

    #[test]
    fn test_parse_distance_label_rejects_garbage() {
        assert!(parse_distance_label("far away").is_err());
        assert!(parse_distance_label("").is_err());
        assert!(parse_distance_label("km").is_err());
        assert!(parse_distance_label("-3 km").is_err());
        assert!(parse_distance_label("NaN km").is_err());
    }

    #[test]
    fn test_legacy_record_conversion() {
        let json = r#"{
            "id": 1,
            "name": "Mount Carmel Overlook",
            "type": "Mountain",
            "rating": 4.8,
            "distance": "2.5 km",
            "difficulty": "Expert",
            "description": "Stunning mountain views with challenging wind conditions",
            "restrictions": "Day flights only",
            "coordinates": { "lat": 32.7767, "lng": 34.9796 },
            "reviews": 15,
            "photos": 8,
            "videos": 3
        }"#;

        let record: LegacySpotRecord = serde_json::from_str(json).unwrap();
        let spot = Spot::try_from(record).unwrap();
        assert_eq!(spot.id, SpotId(1));
        assert_eq!(spot.distance_km, 2.5);
        assert_eq!(spot.landscape_type, LandscapeType::Mountain);
        assert_eq!(spot.media_count(), 11);
        assert!(spot.tags.is_empty());
    }

    fn legacy_record(rating: f64, coordinates: Coordinates) -> LegacySpotRecord {
        LegacySpotRecord {
            id: 9,
            name: "Ridge".to_string(),
            landscape_type: "mountain".to_string(),
            rating,
            distance: "1 km".to_string(),
            difficulty: "expert".to_string(),
            description: String::new(),
            restrictions: String::new(),
            coordinates,
            reviews: 0,
            photos: 0,
            videos: 0,
            tags: vec![],
        }
    }

    #[test]
    fn test_legacy_record_out_of_range_rating_is_refused() {
        let valid = Coordinates::new(32.0, 34.8);
        assert_eq!(
            Spot::try_from(legacy_record(9.0, valid)),
            Err(ParseError::RatingOutOfRange(9.0))
        );
        assert!(Spot::try_from(legacy_record(-0.5, valid)).is_err());
        assert!(Spot::try_from(legacy_record(f64::NAN, valid)).is_err());
        assert_eq!(Spot::try_from(legacy_record(5.0, valid)).unwrap().rating, 5.0);
    }

    #[test]
    fn test_legacy_record_invalid_coordinates_are_refused() {
        let off_map = Coordinates::new(200.0, 500.0);
        assert_eq!(
            Spot::try_from(legacy_record(4.0, off_map)),
            Err(ParseError::InvalidCoordinates(off_map))
        );
    }

    #[test]
    fn test_media_count_does_not_overflow() {
        let mut spot = Spot::try_from(legacy_record(4.0, Coordinates::new(32.0, 34.8))).unwrap();
        spot.photo_count = u32::MAX;
        spot.video_count = 1;
        assert_eq!(spot.media_count(), u64::from(u32::MAX) + 1);
    }
}
