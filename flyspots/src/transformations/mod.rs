//! Spot filtering.
//!
//! This module holds the predicate engine that narrows a spot snapshot down to
//! the spots a viewer asked for. Every function here is pure: the input slice is
//! never mutated and the same snapshot can be filtered any number of times with
//! different filters.
//!
//! # Example
//!
//! ```
//! use flyspots::transformations::{filter_spots, SpotFilter};
//! use flyspots::models::LandscapeType;
//!
//! # fn example(spots: &[flyspots::models::Spot]) {
//! let filter = SpotFilter::default()
//!     .with_landscape_types([LandscapeType::Coastal])
//!     .with_max_distance_km(10.0);
//!
//! let nearby_beaches = filter_spots(spots, &filter);
//! # let _ = nearby_beaches;
//! # }
//! ```

pub mod filtering;

pub use filtering::{filter_spots, matching_spots, preview, FilterPreview, FilterRequest, SpotFilter};
