use std::sync::Arc;
use std::thread;

use pgm_levels::{Dynamic, DynamicConfig, Error, SharedDynamic};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn tiny() -> DynamicConfig {
    DynamicConfig {
        epsilon: 2,
        epsilon_recursive: 1,
        base_capacity: 3,
        growth_factor: 2,
    }
}

#[test]
fn insert_find_erase_single_key() {
    init_tracing();
    let mut index: Dynamic<u64, u64> = Dynamic::new();

    index.insert_or_assign(4, 8).unwrap();
    assert_eq!(index.find(&4), Some(&8));

    index.erase(&4).unwrap();
    assert_eq!(index.find(&4), None);
    assert_eq!(index.len(), 0);
}

#[test]
fn thousand_inserts_with_small_capacities() {
    init_tracing();
    let mut index: Dynamic<u32, u32> = Dynamic::with_config(tiny()).unwrap();

    for key in 1..=1000 {
        index.insert_or_assign(key, key * 10).unwrap();
    }

    assert_eq!(index.len(), 1000);
    for key in 1..=1000 {
        assert_eq!(index.find(&key), Some(&(key * 10)), "missing {key}");
    }
    assert!(index.levels_count() > 3);
}

#[test]
fn erase_half_after_merges() {
    init_tracing();
    let mut index: Dynamic<i64, i64> = Dynamic::with_config(tiny()).unwrap();

    for key in -500..500 {
        index.insert_or_assign(key, -key).unwrap();
    }
    for key in (-500..500).filter(|k| k % 2 == 0) {
        assert!(index.erase(&key).unwrap());
    }
    index.flush().unwrap();

    assert_eq!(index.len(), 500);
    let keys: Vec<i64> = index.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, (-500..500).filter(|k| k % 2 != 0).collect::<Vec<_>>());

    for key in -500..500 {
        index.insert_or_assign(key, key).unwrap();
    }
    assert_eq!(index.len(), 1000);
    assert_eq!(index.find(&-2), Some(&-2));
}

#[test]
fn bulk_load_then_iterate() {
    let entries: Vec<(u64, u64)> = (0..10_000).map(|i| (i * 7, i)).collect();
    let index = Dynamic::from_sorted(entries, tiny()).unwrap();

    let got: Vec<u64> = index.lower_bound(&0).map(|(k, _)| *k).collect();
    assert_eq!(got.len(), 10_000);
    assert!(got.iter().enumerate().all(|(i, k)| *k == i as u64 * 7));
}

#[test]
fn bulk_load_then_mutate() {
    init_tracing();
    let entries: Vec<(u32, char)> = (0..100).map(|i| (i * 2, 'a')).collect();
    let mut index = Dynamic::from_sorted(entries, tiny()).unwrap();

    for i in 0..100 {
        index.insert_or_assign(i * 2 + 1, 'b').unwrap();
    }
    for i in 0..50 {
        index.erase(&(i * 4)).unwrap();
    }

    assert_eq!(index.len(), 150);
    assert_eq!(index.find(&0), None);
    assert_eq!(index.find(&2), Some(&'a'));
    assert_eq!(index.find(&3), Some(&'b'));
    assert_eq!(index.iter().count(), 150);
}

#[test]
fn cursors_restart_by_clone() {
    let mut index: Dynamic<u16, u16> = Dynamic::with_config(tiny()).unwrap();
    for key in 0..64 {
        index.insert_or_assign(key, key).unwrap();
    }

    let mut cursor = index.lower_bound(&10);
    cursor.next();
    let saved = cursor.clone();
    let rest: Vec<u16> = cursor.map(|(k, _)| *k).collect();
    let again: Vec<u16> = saved.map(|(k, _)| *k).collect();

    assert_eq!(rest, again);
    assert_eq!(rest.first(), Some(&11));
}

#[test]
fn snapshot_survives_merges() {
    init_tracing();
    let mut index: Dynamic<u64, u64> = Dynamic::with_config(tiny()).unwrap();
    for key in 0..100 {
        index.insert_or_assign(key, key).unwrap();
    }

    let before = index.snapshot();
    for key in 0..100 {
        index.erase(&key).unwrap();
    }
    index.flush().unwrap();

    assert!(index.is_empty());
    assert_eq!(before.len(), 100);
    assert_eq!(before.range(40..45).count(), 5);
    assert!(before.contains_key(&99));
}

#[test]
fn shared_index_across_threads() {
    init_tracing();
    let shared = Arc::new(SharedDynamic::<u64, String>::with_config(tiny()).unwrap());

    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..250 {
                    let key = i * 4 + t;
                    shared.insert_or_assign(key, format!("v{key}")).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(shared.len(), 1000);
    assert_eq!(shared.find(&777), Some("v777".to_string()));

    let guard = shared.read();
    assert_eq!(guard.range(..10).count(), 10);
}

#[test]
fn rejects_invalid_config() {
    let config = DynamicConfig {
        growth_factor: 1,
        ..Default::default()
    };
    let err = Dynamic::<u64, u64>::with_config(config).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidConfig {
            reason: "growth_factor must be at least 2"
        }
    );
}
