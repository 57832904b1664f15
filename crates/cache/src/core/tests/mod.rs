//! Cache store tests


use super::CacheDir;
use tempfile::TempDir;

/// A fresh store rooted in its own temporary directory
fn test_cache() -> (TempDir, CacheDir) {
    fscache_utils::tracing::init_for_tests();
    let temp_dir = TempDir::new().unwrap();
    let cache = CacheDir::new(temp_dir.path().join("cache")).unwrap();
    (temp_dir, cache)
}
