//! Flyspots - FPV flying spot catalogue engine.
//!
//! Filters and aggregates drone flying spots, validates user contributions and
//! reviews, tracks the offline cache ledger and runs the scripted landscape
//! analysis. The crate has no UI; a shell drives it through [`db::services`].
//!
//! - [`models`]: Spots, reviews, coordinates and closed category sets
//! - [`transformations`]: The filtering engine
//! - [`services`]: Statistics, validation, geodesy, progress and offline cache
//! - [`db`]: Repository traits, in-memory store and the service layer
//! - [`config`]: `flyspots.toml` settings

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod transformations;
