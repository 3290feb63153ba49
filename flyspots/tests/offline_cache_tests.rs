//! Integration tests for the offline cache ledger and scripted tasks.

use std::sync::Arc;

use flyspots::db::repositories::{FileLedgerStore, MemoryLedgerStore};
use flyspots::db::{services, LedgerStore, LocalRepository};
use flyspots::models::SpotId;
use flyspots::services::analysis::{LandscapeAnalysis, ScoreBand};
use flyspots::services::offline::{
    format_cache_size, CacheLedger, DownloadPlan, OfflineDownload,
};
use flyspots::services::progress::{ProgressState, VirtualClock};

#[tokio::test]
async fn test_file_ledger_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let repo = LocalRepository::with_sample_data();
    let spots = services::list_spots(&repo).await.unwrap();

    {
        let ledger = CacheLedger::new(Arc::new(FileLedgerStore::new(&path)), "fpv_");
        ledger.store_spots(&spots).await.unwrap();
    }

    let reopened = CacheLedger::new(Arc::new(FileLedgerStore::new(&path)), "fpv_");
    assert_eq!(reopened.cached_spots().await, spots.as_slice());
    assert!(reopened.cached_maps().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_ledger_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "not json at all").unwrap();

    let ledger = CacheLedger::new(Arc::new(FileLedgerStore::new(&path)), "fpv_");
    assert!(ledger.cached_spots().await.is_empty());
    assert_eq!(ledger.last_update().await, None);

    // The next write replaces the corrupt file.
    ledger.store_maps(&[]).await.unwrap();
    assert!(ledger.cached_media().await.is_empty());
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("fpv_cached_maps"));
}

#[tokio::test]
async fn test_prefixes_do_not_collide() {
    let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
    let a = CacheLedger::new(Arc::clone(&store), "a_");
    let b = CacheLedger::new(Arc::clone(&store), "b_");

    let spots = flyspots::db::seed::sample_spots();
    a.store_spots(&spots).await.unwrap();
    assert_eq!(a.cached_spots().await.len(), 3);
    assert!(b.cached_spots().await.is_empty());

    b.clear().await.unwrap();
    assert_eq!(a.cached_spots().await.len(), 3);
}

#[tokio::test]
async fn test_download_then_clear() {
    let repo = LocalRepository::with_sample_data();
    let spots = services::list_spots(&repo).await.unwrap();
    let store = MemoryLedgerStore::new();
    let ledger = CacheLedger::new(Arc::new(store.clone()), "fpv_");
    let clock = VirtualClock::new();

    let mut download = OfflineDownload::new(DownloadPlan::for_spots(&spots, 5));
    download.start(&clock).unwrap();
    assert!(download.start(&clock).is_err());

    let mut percents = Vec::new();
    for _ in 0..3 {
        clock.advance_ms(1000);
        let state = download.poll(&clock, &ledger).await.unwrap();
        percents.push(state.percent().round());
    }
    assert_eq!(percents, vec![33.0, 67.0, 100.0]);

    let status = ledger.status(&spots, 5).await;
    assert_eq!(status.spots.cached, 3);
    assert_eq!(status.maps.cached, 5);
    assert_eq!(status.media.cached, 38);
    assert_eq!(format_cache_size(status.size_mb()), "411.0 MB");
    assert_eq!(store.len(), 4);

    ledger.clear().await.unwrap();
    assert!(store.is_empty());
    let status = ledger.status(&spots, 5).await;
    assert_eq!(status.spots.percent(), 0.0);
    assert_eq!(status.spots.last_update, None);
}

#[test]
fn test_landscape_analysis_runs_to_canned_report() {
    let clock = VirtualClock::new();
    let mut analysis = LandscapeAnalysis::new(SpotId(1));
    analysis.start(&clock).unwrap();

    clock.advance_ms(800);
    let state = analysis.poll(&clock);
    assert!(state.is_running());
    assert!(analysis.report().is_none());

    clock.advance_ms(3100);
    let state = analysis.poll(&clock);
    assert!(matches!(state, ProgressState::Complete { .. }));

    let report = analysis.report().unwrap();
    assert_eq!(report.cinematic_score, 8.7);
    assert_eq!(report.band(), ScoreBand::Excellent);
}
