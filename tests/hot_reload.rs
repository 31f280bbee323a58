//! Route table hot reload under concurrent readers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use meta_router::config::{load_config, parse_config, watcher::ConfigWatcher};
use meta_router::{MetadataMap, RouteTable};

mod common;

#[test]
fn test_readers_see_whole_snapshots() {
    const READERS: usize = 4;
    const MIN_LOOKUPS: u64 = 1_000;

    let table = Arc::new(RouteTable::from_config(&parse_config(common::PROD_THEN_DEFAULT).unwrap()).unwrap());
    let stop = Arc::new(AtomicBool::new(false));
    let started = Arc::new(Barrier::new(READERS + 1));
    let lookups: Arc<Vec<AtomicU64>> = Arc::new((0..READERS).map(|_| AtomicU64::new(0)).collect());

    let readers: Vec<_> = (0..READERS)
        .map(|id| {
            let table = table.clone();
            let stop = stop.clone();
            let started = started.clone();
            let lookups = lookups.clone();
            thread::spawn(move || {
                let metadata = MetadataMap::new().with("env", "staging");
                started.wait();
                let mut random_value = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = table.load();
                    let cluster = snapshot.route(&metadata, random_value).unwrap().cluster_name().to_string();
                    // Either the old catch-all or one of the new split clusters, never a mix.
                    assert!(
                        cluster == "default" || cluster == "A" || cluster == "B",
                        "unexpected cluster {}",
                        cluster
                    );
                    random_value += 1;
                    lookups[id].fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    let split = parse_config(common::WEIGHTED_SPLIT).unwrap();
    let original = parse_config(common::PROD_THEN_DEFAULT).unwrap();
    started.wait();

    let mut reloads = 0u64;
    while reloads < 100 || lookups.iter().any(|n| n.load(Ordering::Relaxed) < MIN_LOOKUPS) {
        let next = if reloads % 2 == 0 { &split } else { &original };
        table.reload(next).unwrap();
        reloads += 1;
        thread::yield_now();
    }

    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }
    for count in lookups.iter() {
        assert!(count.load(Ordering::Relaxed) >= MIN_LOOKUPS);
    }
}

#[test]
fn test_snapshot_outlives_reload() {
    let table = RouteTable::from_config(&parse_config(common::PROD_THEN_DEFAULT).unwrap()).unwrap();
    let snapshot = table.load();

    table.reload(&parse_config(common::WEIGHTED_SPLIT).unwrap()).unwrap();
    drop(table);

    let prod = MetadataMap::new().with("env", "prod");
    assert_eq!(snapshot.route(&prod, 0).unwrap().cluster_name(), "prod");
}

#[tokio::test]
async fn test_watcher_delivers_one_reload_per_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.toml");
    common::write_config(&path, common::PROD_THEN_DEFAULT);

    let table = RouteTable::from_config(&load_config(&path).unwrap()).unwrap();
    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.with_debounce(Duration::from_millis(200)).run().unwrap();

    common::write_config(&path, common::WEIGHTED_SPLIT);

    let config = tokio::time::timeout(Duration::from_secs(10), updates.recv())
        .await
        .expect("watcher did not deliver the updated configuration")
        .unwrap();
    assert_eq!(config, parse_config(common::WEIGHTED_SPLIT).unwrap());
    table.reload(&config).unwrap();

    let resolved_cluster = table.load().route(&MetadataMap::new(), 30).unwrap().cluster_name().to_string();
    assert_eq!(resolved_cluster, "B");

    // Rewriting the same content does not publish again.
    common::write_config(&path, common::WEIGHTED_SPLIT);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(updates.try_recv().is_err());
}
