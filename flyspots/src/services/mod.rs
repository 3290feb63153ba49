//! Service layer for business logic.
//!
//! Services sit between the repositories and callers. They hold the pure
//! computations (statistics, validation, geodesy) and the scripted long-running
//! actions (landscape analysis, offline download).

pub mod analysis;
pub mod distributions;
pub mod geo;
pub mod offline;
pub mod progress;
pub mod validation;

pub use analysis::{canned_report, LandscapeAnalysis, LandscapeReport, ScoreBand};
pub use distributions::{
    cache_progress, summarize_ratings, summarize_spots, RatingSummary, SpotStats,
};
pub use geo::{haversine_km, with_distances_from, NoFlyZone};
pub use offline::{CacheLedger, CacheStatus, DownloadPlan, OfflineDownload};
pub use progress::{Clock, ProgressState, SystemClock, VirtualClock};
pub use validation::{
    validate_contribution, validate_review, ContributionDraft, ReviewDraft, ValidationError,
};
