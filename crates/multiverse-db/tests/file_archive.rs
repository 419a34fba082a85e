//! Archive persistence through the file store.
//!
//! Exercises the core archive against real files: a fresh archive
//! reopened from disk sees the same entries, and a damaged file opens as an
//! empty archive that can be written again.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use multiverse_core::archive::{AddOutcome, Archive, DEFAULT_STORAGE_KEY, RemoveOutcome};
use multiverse_core::generator::{DEFAULT_EPOCH_DURATION_MS, generate_universe};
use multiverse_db::FileStore;
use multiverse_types::{CurrentUniverse, Seed};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "multiverse_archive_it_{name}_{}_{:?}",
        std::process::id(),
        std::thread::current().id(),
    ))
}

fn current(seed: u64) -> CurrentUniverse {
    CurrentUniverse::from_base(generate_universe(Seed::new(seed), DEFAULT_EPOCH_DURATION_MS))
}

#[tokio::test]
async fn archive_survives_reopen() {
    let dir = scratch("reopen");
    let store = Arc::new(FileStore::new(&dir));

    let archive = Archive::open(store.clone(), DEFAULT_STORAGE_KEY).await;
    assert!(matches!(
        archive.add(&current(1000), 1_800_000_500).await.unwrap(),
        AddOutcome::Added(_)
    ));
    let _ = archive.add(&current(1001), 1_801_800_500).await.unwrap();
    assert_eq!(archive.remove("UNI-1001").await.unwrap(), RemoveOutcome::Removed);
    drop(archive);

    let reopened = Archive::open(store, DEFAULT_STORAGE_KEY).await;
    let entries = reopened.list().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().unwrap().entry, current(1000));
    assert_eq!(entries.first().unwrap().saved_at, 1_800_000_500);

    let raw = std::fs::read_to_string(dir.join("saved_universes.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], "UNI-1000");
    assert_eq!(json[0]["savedAt"], 1_800_000_500_u64);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn corrupt_file_recovers_to_empty() {
    let dir = scratch("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("saved_universes.json"), "[{\"id\": \"UNI-").unwrap();

    let store = Arc::new(FileStore::new(&dir));
    let archive = Archive::open(store.clone(), DEFAULT_STORAGE_KEY).await;
    assert!(archive.is_empty().await);

    let _ = archive.add(&current(7), 1).await.unwrap();
    let reopened = Archive::open(store, DEFAULT_STORAGE_KEY).await;
    assert!(reopened.contains("UNI-7").await);

    std::fs::remove_dir_all(&dir).ok();
}
