use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Difficulty, LandscapeType, ParseError, Spot};

/// Constraints narrowing the visible spot list.
///
/// Set-valued fields use "empty means unrestricted": an empty
/// `landscape_types` keeps every landscape, it does not drop them all.
/// Bounds are inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotFilter {
    pub search_query: String,
    pub landscape_types: BTreeSet<LandscapeType>,
    pub max_distance_km: f64,
    pub difficulties: BTreeSet<Difficulty>,
    pub min_rating: f64,
}

impl Default for SpotFilter {
    /// The widest filter: keeps every well-formed spot.
    fn default() -> Self {
        Self {
            search_query: String::new(),
            landscape_types: BTreeSet::new(),
            max_distance_km: f64::INFINITY,
            difficulties: BTreeSet::new(),
            min_rating: 0.0,
        }
    }
}

impl SpotFilter {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_landscape_types(mut self, types: impl IntoIterator<Item = LandscapeType>) -> Self {
        self.landscape_types = types.into_iter().collect();
        self
    }

    pub fn with_difficulties(mut self, levels: impl IntoIterator<Item = Difficulty>) -> Self {
        self.difficulties = levels.into_iter().collect();
        self
    }

    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = km;
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = rating;
        self
    }

    /// True when the filter would keep every well-formed spot.
    pub fn is_unrestricted(&self) -> bool {
        self.search_query.is_empty()
            && self.landscape_types.is_empty()
            && self.difficulties.is_empty()
            && self.max_distance_km == f64::INFINITY
            && self.min_rating <= 0.0
    }

    /// Evaluate every predicate against one spot.
    ///
    /// A spot whose distance is not a finite number is excluded no matter what
    /// the bound is. The same goes for a NaN rating. One malformed record never
    /// aborts a filtering pass; it just never matches.
    pub fn matches(&self, spot: &Spot) -> bool {
        if !self.search_query.is_empty()
            && !spot
                .name
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
        {
            return false;
        }

        if !self.landscape_types.is_empty() && !self.landscape_types.contains(&spot.landscape_type)
        {
            return false;
        }

        if !(spot.distance_km.is_finite() && spot.distance_km <= self.max_distance_km) {
            return false;
        }

        if !self.difficulties.is_empty() && !self.difficulties.contains(&spot.difficulty) {
            return false;
        }

        spot.rating >= self.min_rating
    }
}

/// Filter settings as the search panel sends them, with free-text category labels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
    pub search_query: String,
    pub landscape_types: Vec<String>,
    pub max_distance: Option<f64>,
    pub difficulty: Vec<String>,
    pub min_rating: Option<f64>,
}

impl TryFrom<FilterRequest> for SpotFilter {
    type Error = ParseError;

    /// Labels are matched case-insensitively; an unknown label is an error
    /// rather than a silently empty result.
    fn try_from(request: FilterRequest) -> Result<Self, Self::Error> {
        let landscape_types = request
            .landscape_types
            .iter()
            .map(|label| label.parse::<LandscapeType>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        let difficulties = request
            .difficulty
            .iter()
            .map(|label| label.parse::<Difficulty>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(SpotFilter {
            search_query: request.search_query,
            landscape_types,
            max_distance_km: request.max_distance.unwrap_or(f64::INFINITY),
            difficulties,
            min_rating: request.min_rating.unwrap_or(0.0),
        })
    }
}

/// Iterate over the spots matching `filter`, in input order.
pub fn matching_spots<'a>(
    spots: &'a [Spot],
    filter: &'a SpotFilter,
) -> impl Iterator<Item = &'a Spot> + 'a {
    spots.iter().filter(move |spot| filter.matches(spot))
}

/// Filter a spot snapshot. Relative order of the input is preserved.
pub fn filter_spots(spots: &[Spot], filter: &SpotFilter) -> Vec<Spot> {
    matching_spots(spots, filter).cloned().collect()
}

/// "N of M spots match" summary shown before a filter is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterPreview {
    pub matched: usize,
    pub total: usize,
    /// First `limit` matches, in input order.
    pub top: Vec<Spot>,
    /// Matches beyond `top`.
    pub remaining: usize,
}

pub fn preview(spots: &[Spot], filter: &SpotFilter, limit: usize) -> FilterPreview {
    let mut top = Vec::with_capacity(limit);
    let mut matched = 0;
    for spot in matching_spots(spots, filter) {
        if matched < limit {
            top.push(spot.clone());
        }
        matched += 1;
    }

    FilterPreview {
        matched,
        total: spots.len(),
        top,
        remaining: matched.saturating_sub(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, SpotId};

    fn spot(
        id: u64,
        name: &str,
        landscape_type: LandscapeType,
        rating: f64,
        distance_km: f64,
        difficulty: Difficulty,
    ) -> Spot {
        Spot {
            id: SpotId(id),
            name: name.to_string(),
            landscape_type,
            rating,
            distance_km,
            difficulty,
            description: String::new(),
            restrictions: String::new(),
            coordinates: Coordinates::new(32.0, 34.8),
            review_count: 0,
            photo_count: 0,
            video_count: 0,
            tags: vec![],
        }
    }

    fn sample_spots() -> Vec<Spot> {
        vec![
            spot(1, "Mount Carmel Overlook", LandscapeType::Mountain, 4.8, 2.5, Difficulty::Expert),
            spot(2, "Tel Aviv Beach", LandscapeType::Coastal, 4.2, 5.1, Difficulty::Beginner),
            spot(3, "Yarkon Park", LandscapeType::Urban, 4.5, 1.8, Difficulty::Intermediate),
        ]
    }

    fn names(spots: &[Spot]) -> Vec<&str> {
        spots.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_filter_keeps_everything_in_order() {
        let spots = sample_spots();
        let filter = SpotFilter::default();
        assert!(filter.is_unrestricted());
        assert_eq!(filter_spots(&spots, &filter), spots);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_spots(&[], &SpotFilter::default()).is_empty());
    }

    #[test]
    fn test_distance_bound_scenario() {
        let spots = sample_spots()[..2].to_vec();
        let filter = SpotFilter::default().with_max_distance_km(3.0);
        assert_eq!(names(&filter_spots(&spots, &filter)), vec!["Mount Carmel Overlook"]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let spots = sample_spots();
        let filter = SpotFilter::default()
            .with_max_distance_km(2.5)
            .with_min_rating(4.5);
        assert_eq!(
            names(&filter_spots(&spots, &filter)),
            vec!["Mount Carmel Overlook", "Yarkon Park"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let spots = sample_spots();
        let filter = SpotFilter::default().with_search("BEACH");
        assert_eq!(names(&filter_spots(&spots, &filter)), vec!["Tel Aviv Beach"]);

        let filter = SpotFilter::default().with_search("ar");
        assert_eq!(
            names(&filter_spots(&spots, &filter)),
            vec!["Mount Carmel Overlook", "Yarkon Park"]
        );
    }

    #[test]
    fn test_category_sets_restrict_when_non_empty() {
        let spots = sample_spots();

        let filter = SpotFilter::default()
            .with_landscape_types([LandscapeType::Coastal, LandscapeType::Urban]);
        assert_eq!(
            names(&filter_spots(&spots, &filter)),
            vec!["Tel Aviv Beach", "Yarkon Park"]
        );

        let filter = SpotFilter::default().with_difficulties([Difficulty::Expert]);
        assert_eq!(names(&filter_spots(&spots, &filter)), vec!["Mount Carmel Overlook"]);

        let filter = SpotFilter::default()
            .with_landscape_types([LandscapeType::Desert]);
        assert!(filter_spots(&spots, &filter).is_empty());
    }

    #[test]
    fn test_malformed_distance_fails_closed() {
        let mut spots = sample_spots();
        spots[0].distance_km = f64::NAN;
        spots[1].distance_km = f64::INFINITY;

        let result = filter_spots(&spots, &SpotFilter::default());
        assert_eq!(names(&result), vec!["Yarkon Park"]);
    }

    #[test]
    fn test_nan_rating_never_matches() {
        let mut spots = sample_spots();
        spots[2].rating = f64::NAN;
        let result = filter_spots(&spots, &SpotFilter::default());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_request_conversion() {
        let json = r#"{
            "searchQuery": "",
            "landscapeTypes": ["mountain", "COASTAL"],
            "maxDistance": 50,
            "difficulty": ["expert"],
            "minRating": 0
        }"#;
        let request: FilterRequest = serde_json::from_str(json).unwrap();
        let filter = SpotFilter::try_from(request).unwrap();

        assert_eq!(filter.landscape_types.len(), 2);
        assert!(filter.difficulties.contains(&Difficulty::Expert));
        assert_eq!(filter.max_distance_km, 50.0);

        let spots = sample_spots();
        assert_eq!(names(&filter_spots(&spots, &filter)), vec!["Mount Carmel Overlook"]);
    }

    #[test]
    fn test_filter_request_rejects_unknown_label() {
        let request = FilterRequest {
            landscape_types: vec!["moon".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            SpotFilter::try_from(request),
            Err(ParseError::UnknownLandscapeType(_))
        ));
    }

    #[test]
    fn test_empty_request_is_unrestricted() {
        let filter = SpotFilter::try_from(FilterRequest::default()).unwrap();
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn test_preview() {
        let spots = sample_spots();
        let summary = preview(&spots, &SpotFilter::default(), 2);
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.total, 3);
        assert_eq!(names(&summary.top), vec!["Mount Carmel Overlook", "Tel Aviv Beach"]);
        assert_eq!(summary.remaining, 1);

        let summary = preview(&spots, &SpotFilter::default().with_min_rating(5.0), 3);
        assert_eq!(summary.matched, 0);
        assert!(summary.top.is_empty());
        assert_eq!(summary.remaining, 0);
    }
}
