//! Validation of user submissions.
//!
//! Two entry points feed the spot store: new spot contributions and reviews.
//! Both are checked here in full before anything is written, and every failing
//! field is reported at once so the form can highlight all of them.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{
    Coordinates, Difficulty, LandscapeType, Review, ReviewId, Spot, SpotId, StarRating,
};

/// Maximum number of photos or videos attached to one submission.
pub const MAX_ATTACHMENTS: usize = 5;

/// Restrictions text put on spots that came from a contribution.
pub const CONTRIBUTED_RESTRICTIONS: &str = "User contributed - verify regulations";

/// Author label used when a review is submitted without one.
pub const DEFAULT_AUTHOR: &str = "CurrentUser";

/// Submission field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    LandscapeType,
    Difficulty,
    Coordinates,
    Rating,
    Comment,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::LandscapeType => "landscapeType",
            Field::Difficulty => "difficulty",
            Field::Coordinates => "coordinates",
            Field::Rating => "rating",
            Field::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    Missing,
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: Field,
    pub problem: Problem,
    pub detail: String,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.problem {
            Problem::Missing => "missing",
            Problem::Invalid => "invalid",
        };
        write!(f, "{} ({}): {}", self.field.as_str(), kind, self.detail)
    }
}

/// A rejected submission. Carries every failing field, never just the first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Submission rejected: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn fields(&self) -> Vec<Field> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

#[derive(Default)]
struct IssueCollector {
    issues: Vec<FieldIssue>,
}

impl IssueCollector {
    fn missing(&mut self, field: Field, detail: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            problem: Problem::Missing,
            detail: detail.into(),
        });
    }

    fn invalid(&mut self, field: Field, detail: impl Into<String>) {
        self.issues.push(FieldIssue {
            field,
            problem: Problem::Invalid,
            detail: detail.into(),
        });
    }

    fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            issues: self.issues,
        }
    }
}

/// Parse a required closed-set label, recording a missing or invalid issue.
fn required_label<T: std::str::FromStr>(
    issues: &mut IssueCollector,
    field: Field,
    label: &str,
) -> Option<T> {
    if label.trim().is_empty() {
        issues.missing(field, format!("{} is required", field.as_str()));
        return None;
    }
    match label.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            issues.invalid(field, format!("unknown value {:?}", label));
            None
        }
    }
}

/// Trim tags, drop blanks and duplicates. First occurrence wins.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn attachment_count(files: &[String]) -> u32 {
    files.len().min(MAX_ATTACHMENTS) as u32
}

/// New-spot form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributionDraft {
    pub name: String,
    pub description: String,
    pub landscape_type: String,
    pub difficulty: String,
    pub coordinates: Option<Coordinates>,
    /// Attached photo file names; only the first five count.
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    /// Optional initial rating in [0, 5]; 0 means unrated.
    pub rating: f64,
    pub tags: Vec<String>,
}

/// Check a contribution and build the spot it describes.
///
/// The spot gets `id`, zero reviews and a distance of 0 km; distance from a
/// viewer is recomputed later from coordinates. Without coordinates the spot is
/// placed at `default_location`.
pub fn validate_contribution(
    draft: &ContributionDraft,
    id: SpotId,
    default_location: Coordinates,
) -> Result<Spot, ValidationError> {
    let mut issues = IssueCollector::default();

    if draft.name.trim().is_empty() {
        issues.missing(Field::Name, "name is required");
    }
    if draft.description.trim().is_empty() {
        issues.missing(Field::Description, "description is required");
    }
    let landscape_type: Option<LandscapeType> =
        required_label(&mut issues, Field::LandscapeType, &draft.landscape_type);
    let difficulty: Option<Difficulty> =
        required_label(&mut issues, Field::Difficulty, &draft.difficulty);

    let coordinates = draft.coordinates.unwrap_or(default_location);
    if !coordinates.is_valid() {
        issues.invalid(
            Field::Coordinates,
            format!("{} is outside the valid range", coordinates),
        );
    }

    if !(0.0..=5.0).contains(&draft.rating) {
        issues.invalid(
            Field::Rating,
            format!("rating must be between 0 and 5, got {}", draft.rating),
        );
    }

    let (Some(landscape_type), Some(difficulty), true) =
        (landscape_type, difficulty, issues.is_empty())
    else {
        return Err(issues.into_error());
    };

    Ok(Spot {
        id,
        name: draft.name.trim().to_string(),
        landscape_type,
        rating: draft.rating,
        distance_km: 0.0,
        difficulty,
        description: draft.description.trim().to_string(),
        restrictions: CONTRIBUTED_RESTRICTIONS.to_string(),
        coordinates,
        review_count: 0,
        photo_count: attachment_count(&draft.photos),
        video_count: attachment_count(&draft.videos),
        tags: normalize_tags(&draft.tags),
    })
}

/// Review form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewDraft {
    pub author: Option<String>,
    /// Whole stars, 1 to 5. 0 means the user never picked a rating.
    pub rating: u8,
    pub comment: String,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    pub tags: Vec<String>,
}

/// Check a review submission and build the review.
pub fn validate_review(
    draft: &ReviewDraft,
    id: ReviewId,
    spot_id: SpotId,
    date: NaiveDate,
) -> Result<Review, ValidationError> {
    let mut issues = IssueCollector::default();

    let rating = match draft.rating {
        0 => {
            issues.missing(Field::Rating, "pick a rating from 1 to 5 stars");
            None
        }
        stars => {
            let rating = StarRating::new(stars);
            if rating.is_none() {
                issues.invalid(Field::Rating, format!("{} is not a 1-5 star rating", stars));
            }
            rating
        }
    };

    if draft.comment.trim().is_empty() {
        issues.missing(Field::Comment, "comment is required");
    }

    let author = draft
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string();

    let (Some(rating), true) = (rating, issues.is_empty()) else {
        return Err(issues.into_error());
    };

    Ok(Review {
        id,
        spot_id,
        author,
        rating,
        comment: draft.comment.trim().to_string(),
        date,
        likes: 0,
        reports: 0,
        photo_count: attachment_count(&draft.photos),
        video_count: attachment_count(&draft.videos),
        tags: normalize_tags(&draft.tags),
    })
}
