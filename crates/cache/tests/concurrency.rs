//! Concurrent access to one cache directory from many threads and handles

use fscache::{CacheDir, CacheKey};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const WRITERS: usize = 8;
const ROUNDS: usize = 25;

fn payload(writer: usize) -> Vec<u64> {
    vec![writer as u64; 4096]
}

// Auto-detected locking is only exclusive on unix
#[cfg(unix)]
#[test]
fn readers_never_see_partial_writes() {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheDir::new(temp_dir.path()).unwrap();
    let key = CacheKey::from(["contended", "entry"]);
    cache.set(&key, &payload(0)).unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS * 2));
    let mut handles = Vec::new();

    for writer in 0..WRITERS {
        let cache = cache.clone();
        let key = key.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                cache.set(&key, &payload(writer)).unwrap();
            }
        }));
    }

    for _ in 0..WRITERS {
        let cache = cache.clone();
        let key = key.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                let (value, _) = cache.get::<Vec<u64>>(&key).unwrap();
                assert_eq!(value.len(), 4096);
                assert!(value.iter().all(|v| *v == value[0]));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let (last, _) = cache.get::<Vec<u64>>(&key).unwrap();
    assert!((last[0] as usize) < WRITERS);
}

#[test]
fn independent_handles_share_entries() {
    let temp_dir = TempDir::new().unwrap();
    let first = CacheDir::new(temp_dir.path()).unwrap();
    let second = CacheDir::new(temp_dir.path()).unwrap();

    first.set(["shared"], &"from first").unwrap();
    assert_eq!(second.get::<String>(["shared"]).unwrap().0, "from first");

    second.set_invalid(["shared"]).unwrap();
    assert!(first.get::<String>(["shared"]).unwrap_err().is_not_found());
    assert!(first.get_invalid(["shared"]).is_some());
}

#[test]
fn distinct_keys_do_not_interfere() {
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheDir::new(temp_dir.path()).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let cache = cache.clone();
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let key = fscache::cache_key!["writers", writer, round];
                    cache.set(&key, &(writer, round)).unwrap();
                    cache.touch(&key).unwrap();
                    assert_eq!(cache.get::<(usize, usize)>(&key).unwrap().0, (writer, round));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for writer in 0..WRITERS {
        let info = cache.stat(fscache::cache_key!["writers", writer]).unwrap();
        assert!(info.is_dir());
    }
}
