// src/watch/mod.rs

//! Change detection by polling.
//!
//! This module is responsible for:
//! - Deciding which files are watched (extension set + exclude globs).
//! - Taking snapshots of the watched tree (path → mtime or content hash).
//! - Reporting what differs between two snapshots.
//!
//! It knows nothing about processes; the supervisor compares snapshots and
//! decides when to restart.

pub mod filter;
pub mod hash;
pub mod snapshot;

pub use filter::{DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS, WatchFilter};
pub use hash::compute_file_hash;
pub use snapshot::{FileStamp, Snapshot, SnapshotDiff, Snapshotter, snapshot};
