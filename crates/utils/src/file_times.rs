//! Modification-time helpers for cache entries
//!
//! Entry mtimes are the only metadata the cache keeps. They are written by
//! path, which also works for directory entries.

use filetime::FileTime;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Set the modification time of `path`, bumping its access time to now
pub fn set_modified(path: &Path, mtime: SystemTime) -> io::Result<()> {
    filetime::set_file_times(
        path,
        FileTime::now(),
        FileTime::from_system_time(mtime),
    )
}

/// Time elapsed since `then`, zero if `then` lies in the future
pub fn age(then: SystemTime) -> std::time::Duration {
    SystemTime::now().duration_since(then).unwrap_or_default()
}
