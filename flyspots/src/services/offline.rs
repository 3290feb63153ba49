//! Offline cache ledger.
//!
//! The ledger records what has been staged for offline use under four keys:
//! `cached_spots`, `cached_maps`, `cached_media` and `cache_last_update`, each
//! prefixed with the configured key prefix. List entries hold JSON arrays; the
//! timestamp is a bare RFC 3339 string.
//!
//! Reads never fail. A missing key reads as an empty list (or no timestamp);
//! an unreadable or corrupt entry is logged and treated the same way. Writes
//! replace the whole entry.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::distributions::cache_progress;
use super::progress::{Clock, ProgressError, ProgressState, Stage, SteppedTask};
use crate::db::repository::{LedgerStore, RepositoryResult};
use crate::models::{Spot, SpotId};

pub const SPOTS_KEY: &str = "cached_spots";
pub const MAPS_KEY: &str = "cached_maps";
pub const MEDIA_KEY: &str = "cached_media";
pub const LAST_UPDATE_KEY: &str = "cache_last_update";

/// Estimated storage per cached item, in MB.
const SPOT_SIZE_MB: f64 = 2.0;
const MAP_TILE_SIZE_MB: f64 = 5.0;
const MEDIA_SIZE_MB: f64 = 10.0;

/// Simulated duration of each download stage.
const DOWNLOAD_STAGE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    pub id: u32,
    pub tile: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedMedia {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub spot_id: SpotId,
    #[serde(alias = "id")]
    pub index: u32,
}

/// Typed view over a [`LedgerStore`].
#[derive(Clone)]
pub struct CacheLedger {
    store: Arc<dyn LedgerStore>,
    key_prefix: String,
}

impl CacheLedger {
    pub fn new(store: Arc<dyn LedgerStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.key_prefix, name)
    }

    async fn read_raw(&self, name: &str) -> Option<String> {
        let key = self.key(name);
        match self.store.read(&key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ledger entry {} unreadable, treating as empty: {}", key, e);
                None
            }
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let Some(raw) = self.read_raw(name).await else {
            return Vec::new();
        };

        let mut de = serde_json::Deserializer::from_str(&raw);
        match serde_path_to_error::deserialize(&mut de) {
            Ok(items) => items,
            Err(e) => {
                log::warn!(
                    "Ledger entry {} is corrupt at {}, treating as empty: {}",
                    self.key(name),
                    e.path(),
                    e.inner()
                );
                Vec::new()
            }
        }
    }

    async fn write_list<T: Serialize>(&self, name: &str, items: &[T]) -> RepositoryResult<()> {
        let value = serde_json::to_string(items)?;
        self.store.write(&self.key(name), value).await
    }

    pub async fn cached_spots(&self) -> Vec<Spot> {
        self.read_list(SPOTS_KEY).await
    }

    pub async fn cached_maps(&self) -> Vec<MapTile> {
        self.read_list(MAPS_KEY).await
    }

    pub async fn cached_media(&self) -> Vec<CachedMedia> {
        self.read_list(MEDIA_KEY).await
    }

    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        let raw = self.read_raw(LAST_UPDATE_KEY).await?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                log::warn!(
                    "Ledger entry {} holds an invalid timestamp {:?}: {}",
                    self.key(LAST_UPDATE_KEY),
                    raw,
                    e
                );
                None
            }
        }
    }

    pub async fn store_spots(&self, spots: &[Spot]) -> RepositoryResult<()> {
        self.write_list(SPOTS_KEY, spots).await
    }

    pub async fn store_maps(&self, tiles: &[MapTile]) -> RepositoryResult<()> {
        self.write_list(MAPS_KEY, tiles).await
    }

    pub async fn store_media(&self, media: &[CachedMedia]) -> RepositoryResult<()> {
        self.write_list(MEDIA_KEY, media).await
    }

    pub async fn touch_last_update(&self, at: DateTime<Utc>) -> RepositoryResult<()> {
        self.store
            .write(&self.key(LAST_UPDATE_KEY), at.to_rfc3339())
            .await
    }

    /// Remove all four ledger entries.
    pub async fn clear(&self) -> RepositoryResult<()> {
        for name in [SPOTS_KEY, MAPS_KEY, MEDIA_KEY, LAST_UPDATE_KEY] {
            self.store.remove(&self.key(name)).await?;
        }
        log::info!("Offline cache cleared");
        Ok(())
    }

    /// Current cache status against the live spot collection.
    pub async fn status(&self, spots: &[Spot], map_tiles: usize) -> CacheStatus {
        let last_update = self.last_update().await;
        let category = |cached: usize, total: usize| {
            if cached > total {
                log::warn!(
                    "Ledger holds {} entries but only {} are expected",
                    cached,
                    total
                );
            }
            CacheCategory {
                cached,
                total,
                last_update,
            }
        };

        CacheStatus {
            spots: category(self.cached_spots().await.len(), spots.len()),
            maps: category(self.cached_maps().await.len(), map_tiles),
            media: category(self.cached_media().await.len(), media_total(spots)),
        }
    }
}

fn media_total(spots: &[Spot]) -> usize {
    spots.iter().fold(0usize, |total, spot| {
        total.saturating_add(usize::try_from(spot.media_count()).unwrap_or(usize::MAX))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheCategory {
    pub cached: usize,
    pub total: usize,
    pub last_update: Option<DateTime<Utc>>,
}

impl CacheCategory {
    pub fn percent(&self) -> f64 {
        cache_progress(self.cached, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub spots: CacheCategory,
    pub maps: CacheCategory,
    pub media: CacheCategory,
}

impl CacheStatus {
    /// Estimated cache footprint in MB.
    pub fn size_mb(&self) -> f64 {
        self.spots.cached as f64 * SPOT_SIZE_MB
            + self.maps.cached as f64 * MAP_TILE_SIZE_MB
            + self.media.cached as f64 * MEDIA_SIZE_MB
    }
}

/// Human-readable size: KB below 1 MB, GB from 1024 MB.
pub fn format_cache_size(size_mb: f64) -> String {
    if size_mb < 1.0 {
        format!("{:.0} KB", size_mb * 1024.0)
    } else if size_mb < 1024.0 {
        format!("{:.1} MB", size_mb)
    } else {
        format!("{:.1} GB", size_mb / 1024.0)
    }
}

/// Relative description of the last cache update.
pub fn format_last_update(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = last_update else {
        return "Never".to_string();
    };
    let hours = (now - ts).num_minutes() as f64 / 60.0;
    if hours < 1.0 {
        "Just now".to_string()
    } else if hours < 24.0 {
        format!("{} hours ago", hours.floor() as i64)
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

/// Everything an offline download stages, computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub spots: Vec<Spot>,
    pub maps: Vec<MapTile>,
    pub media: Vec<CachedMedia>,
}

impl DownloadPlan {
    pub fn for_spots(spots: &[Spot], map_tiles: usize) -> Self {
        let maps = (0..map_tiles as u32)
            .map(|id| MapTile {
                id,
                tile: format!("tile_{}", id),
            })
            .collect();

        let media = spots
            .iter()
            .flat_map(|spot| {
                let photos = (0..spot.photo_count).map(move |index| CachedMedia {
                    kind: MediaKind::Photo,
                    spot_id: spot.id,
                    index,
                });
                let videos = (0..spot.video_count).map(move |index| CachedMedia {
                    kind: MediaKind::Video,
                    spot_id: spot.id,
                    index,
                });
                photos.chain(videos)
            })
            .collect();

        Self {
            spots: spots.to_vec(),
            maps,
            media,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub spots: usize,
    pub maps: usize,
    pub media: usize,
}

/// Scripted three-stage download into the ledger.
///
/// Each stage writes its ledger entry when it finishes; the final stage also
/// stamps `cache_last_update`.
pub struct OfflineDownload {
    plan: DownloadPlan,
    task: SteppedTask<DownloadSummary>,
}

impl OfflineDownload {
    pub fn new(plan: DownloadPlan) -> Self {
        Self {
            plan,
            task: SteppedTask::new(vec![
                Stage::millis("spots", DOWNLOAD_STAGE_MS),
                Stage::millis("maps", DOWNLOAD_STAGE_MS),
                Stage::millis("media", DOWNLOAD_STAGE_MS),
            ]),
        }
    }

    pub fn plan(&self) -> &DownloadPlan {
        &self.plan
    }

    pub fn state(&self) -> &ProgressState<DownloadSummary> {
        self.task.state()
    }

    pub fn start(&mut self, clock: &dyn Clock) -> Result<(), ProgressError> {
        let summary = DownloadSummary {
            spots: self.plan.spots.len(),
            maps: self.plan.maps.len(),
            media: self.plan.media.len(),
        };
        log::info!(
            "Starting offline download: {} spots, {} map tiles, {} media items",
            summary.spots,
            summary.maps,
            summary.media
        );
        self.task.start(clock, summary)
    }

    /// Advance against `clock` and persist every stage that finished.
    ///
    /// A failed write stops the download and returns it to idle.
    pub async fn poll(
        &mut self,
        clock: &dyn Clock,
        ledger: &CacheLedger,
    ) -> RepositoryResult<&ProgressState<DownloadSummary>> {
        let finished = self.task.poll(clock);
        let advanced = !finished.is_empty();
        for stage in finished {
            let written = match stage {
                0 => ledger.store_spots(&self.plan.spots).await,
                1 => ledger.store_maps(&self.plan.maps).await,
                _ => ledger.store_media(&self.plan.media).await,
            };
            if let Err(e) = written {
                log::error!("Offline download failed at stage {}: {}", stage, e);
                self.task.reset();
                return Err(e);
            }
            log::debug!("Offline download stage {} stored", stage);
        }

        if advanced && matches!(self.task.state(), ProgressState::Complete { .. }) {
            if let Err(e) = ledger.touch_last_update(Utc::now()).await {
                self.task.reset();
                return Err(e);
            }
        }

        Ok(self.task.state())
    }
}
