// src/watch/snapshot.rs

//! Point-in-time snapshots of the watched tree.
//!
//! A [`Snapshot`] maps every watched file to a [`FileStamp`]. Two snapshots
//! are compared with plain structural equality; any added, removed or
//! re-stamped file makes them differ.
//!
//! Error policy: a file that cannot be stat'd (or hashed) and a directory that
//! cannot be listed are skipped and logged at debug level. Taking a snapshot
//! never fails. Symlinked directories are not followed, so link cycles cannot
//! make the walk loop.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, trace, warn};

use crate::fs::{DirEntry, EntryKind, FileSystem};
use crate::types::ChangeDetection;
use crate::watch::filter::WatchFilter;
use crate::watch::hash::compute_file_hash;

/// What is recorded for each watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStamp {
    Modified(SystemTime),
    /// blake3 hex digest of the contents.
    Content(String),
}

/// Watched path → stamp. Ordering is irrelevant for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<PathBuf, FileStamp>,
}

impl FromIterator<(PathBuf, FileStamp)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, FileStamp)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileStamp> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Which paths changed between `self` (older) and `newer`.
    pub fn diff(&self, newer: &Snapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();

        for (path, stamp) in &newer.files {
            match self.files.get(path) {
                None => diff.added.push(path.clone()),
                Some(old) if old != stamp => diff.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in self.files.keys() {
            if !newer.files.contains_key(path) {
                diff.removed.push(path.clone());
            }
        }

        diff
    }
}

/// Paths that differ between two snapshots, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Up to `n` changed paths, for log lines.
    pub fn sample(&self, n: usize) -> Vec<&Path> {
        self.modified
            .iter()
            .chain(&self.added)
            .chain(&self.removed)
            .take(n)
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Walk `root` and stamp every file accepted by `filter`.
pub fn snapshot(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &WatchFilter,
    mode: ChangeDetection,
) -> Snapshot {
    let mut files = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.list_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => {
                warn!(root = ?root, error = %err, "cannot list watch root; snapshot is empty");
                continue;
            }
            Err(err) => {
                debug!(dir = ?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for DirEntry { path, kind } in entries {
            let rel = path.strip_prefix(root).unwrap_or(&path);

            if kind == EntryKind::Dir {
                if filter.is_excluded(rel) {
                    trace!(dir = ?rel, "directory excluded");
                } else {
                    stack.push(path);
                }
                continue;
            }

            if !filter.matches_file(rel) {
                continue;
            }

            match stamp_file(fs, &path, mode) {
                Ok(stamp) => {
                    files.insert(path, stamp);
                }
                Err(err) => {
                    debug!(path = ?path, error = %err, "skipping file that cannot be stamped");
                }
            }
        }
    }

    Snapshot { files }
}

fn stamp_file(fs: &dyn FileSystem, path: &Path, mode: ChangeDetection) -> anyhow::Result<FileStamp> {
    match mode {
        ChangeDetection::Mtime => fs.modified(path).map(FileStamp::Modified),
        ChangeDetection::Hash => compute_file_hash(fs, path).map(FileStamp::Content),
    }
}

/// Everything needed to re-take the same snapshot over and over.
#[derive(Debug, Clone)]
pub struct Snapshotter {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    filter: WatchFilter,
    mode: ChangeDetection,
}

impl Snapshotter {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        filter: WatchFilter,
        mode: ChangeDetection,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            filter,
            mode,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn take(&self) -> Snapshot {
        snapshot(self.fs.as_ref(), &self.root, &self.filter, self.mode)
    }
}
