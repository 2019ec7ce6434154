//! Tests for snapshot sharing and reloads

use super::*;
use crate::Error;
use crate::app::services::station_directory::DirectoryHandle;
use crate::config::DirectoryConfig;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_snapshot_survives_replace() {
    let handle = DirectoryHandle::new(sample_directory());
    let before = handle.snapshot();

    let (smaller, _) = StationDirectory::from_stations(vec![create_test_station(
        "U-Ado",
        "Adenauerplatz",
        52.499755,
        13.307208,
    )]);
    let previous = handle.replace(smaller);

    assert!(Arc::ptr_eq(&before, &previous));
    assert_eq!(before.station_count(), 5);
    assert_eq!(handle.snapshot().station_count(), 1);
}

#[test]
fn test_clones_share_the_same_directory() {
    let handle = DirectoryHandle::new(sample_directory());
    let other = handle.clone();

    other.replace(StationDirectory::new());

    assert_eq!(handle.snapshot().station_count(), 0);
}

#[tokio::test]
async fn test_reload_without_dataset_is_rejected() {
    let handle = DirectoryHandle::new(sample_directory());
    let result = handle.reload().await;
    assert!(matches!(result, Err(Error::Configuration { .. })));
    assert_eq!(handle.snapshot().station_count(), 5);
}

#[tokio::test]
async fn test_reload_picks_up_new_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let stations = sample_stations();
    write_stations_file(temp_dir.path(), &stations[..2]);

    let config = DirectoryConfig {
        stations_path: temp_dir.path().join("stations.json"),
        lines_path: None,
    };
    let (handle, _) = DirectoryHandle::load(config).await.unwrap();
    let first = handle.snapshot();
    assert_eq!(first.station_count(), 2);

    write_stations_file(temp_dir.path(), &stations);
    let stats = handle.reload().await.unwrap();

    assert_eq!(stats.stations_loaded, 5);
    assert_eq!(handle.snapshot().station_count(), 5);
    assert_eq!(first.station_count(), 2);
}

#[tokio::test]
async fn test_failed_reload_keeps_current_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    write_stations_file(temp_dir.path(), &sample_stations());

    let config = DirectoryConfig {
        stations_path: temp_dir.path().join("stations.json"),
        lines_path: None,
    };
    let (handle, _) = DirectoryHandle::load(config).await.unwrap();

    write_file(temp_dir.path(), "stations.json", "{ not json");
    assert!(handle.reload().await.is_err());
    assert_eq!(handle.snapshot().station_count(), 5);
}
