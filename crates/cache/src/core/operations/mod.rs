//! Cache operations module
//!
//! Every operation is implemented directly on `CacheDir`.

mod files;
mod metadata;
mod read;
mod write;
