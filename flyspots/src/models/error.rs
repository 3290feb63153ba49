//! Parse errors for text coming in from the presentation layer.

use super::Coordinates;

/// Failure to turn user or legacy text into a typed model value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown landscape type: {0}")]
    UnknownLandscapeType(String),

    #[error("Unknown difficulty level: {0}")]
    UnknownDifficulty(String),

    #[error("Malformed distance label: {0:?}")]
    MalformedDistance(String),

    #[error("Rating {0} is outside 0-5")]
    RatingOutOfRange(f64),

    #[error("Coordinates {0} are outside the valid range")]
    InvalidCoordinates(Coordinates),
}
