//! Configuration file support.
//!
//! Settings are read from a `flyspots.toml` file. Every section is optional and
//! falls back to the defaults below, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::repository::RepositoryError;
use crate::models::Coordinates;
use crate::transformations::SpotFilter;

/// Environment variable overriding `[ledger] backend`.
pub const LEDGER_BACKEND_ENV: &str = "FLYSPOTS_LEDGER";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlyspotsConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub reference: ReferenceSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub offline: OfflineSettings,
}

/// Spot store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// Offline cache ledger storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    #[serde(default = "default_ledger_backend")]
    pub backend: String,
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            backend: default_ledger_backend(),
            path: default_ledger_path(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// The viewer's reference point, used when a contribution has no location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSettings {
    #[serde(default = "default_lat")]
    pub lat: f64,
    #[serde(default = "default_lng")]
    pub lng: f64,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lng: default_lng(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Distance bound the search panel opens with.
    #[serde(default = "default_max_distance_km")]
    pub default_max_distance_km: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            default_max_distance_km: default_max_distance_km(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineSettings {
    /// Number of map tiles an offline download fetches.
    #[serde(default = "default_map_tiles")]
    pub map_tiles: usize,
}

impl Default for OfflineSettings {
    fn default() -> Self {
        Self {
            map_tiles: default_map_tiles(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_ledger_backend() -> String {
    "memory".to_string()
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("offline-cache.json")
}

fn default_key_prefix() -> String {
    "fpv_".to_string()
}

fn default_lat() -> f64 {
    32.0853
}

fn default_lng() -> f64 {
    34.7818
}

fn default_max_distance_km() -> f64 {
    50.0
}

fn default_map_tiles() -> usize {
    5
}

/// Spot store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory store
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Ledger storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Memory,
    File,
}

impl FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            _ => Err(format!("Unknown ledger backend: {}", s)),
        }
    }
}

impl LedgerBackend {
    /// Backend named by `FLYSPOTS_LEDGER`, if set to a known value.
    pub fn from_env() -> Option<Self> {
        std::env::var(LEDGER_BACKEND_ENV)
            .ok()
            .and_then(|s| Self::from_str(&s).ok())
    }
}

impl FlyspotsConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConfigurationError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `flyspots.toml` in:
    /// 1. Current directory
    /// 2. `flyspots/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("flyspots.toml"),
            PathBuf::from("flyspots/flyspots.toml"),
            PathBuf::from("../flyspots.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(RepositoryError::ConfigurationError(
            "No flyspots.toml found in standard locations".to_string(),
        ))
    }

    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Invalid repository type: {}", e))
        })
    }

    /// Ledger backend, with `FLYSPOTS_LEDGER` taking precedence over the file.
    pub fn ledger_backend(&self) -> Result<LedgerBackend, RepositoryError> {
        self.ledger_backend_with(LedgerBackend::from_env())
    }

    /// Ledger backend with `override_backend` in place of the environment.
    pub fn ledger_backend_with(
        &self,
        override_backend: Option<LedgerBackend>,
    ) -> Result<LedgerBackend, RepositoryError> {
        if let Some(backend) = override_backend {
            return Ok(backend);
        }
        LedgerBackend::from_str(&self.ledger.backend).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Invalid ledger backend: {}", e))
        })
    }

    /// Reference point, validated.
    pub fn reference_point(&self) -> Result<Coordinates, RepositoryError> {
        let point = Coordinates::new(self.reference.lat, self.reference.lng);
        if !point.is_valid() {
            return Err(RepositoryError::ConfigurationError(format!(
                "Reference point {} is outside the valid range",
                point
            )));
        }
        Ok(point)
    }

    /// Filter the search panel opens with.
    pub fn initial_filter(&self) -> SpotFilter {
        SpotFilter::default().with_max_distance_km(self.filters.default_max_distance_km)
    }
}
