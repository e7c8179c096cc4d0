// src/fs/mod.rs

//! Filesystem access used by the change detector and config loader.
//!
//! Snapshotting only ever reads, so the trait is read-only. Tests swap in
//! [`mock::MockFileSystem`] to exercise the skip-on-error policy without
//! depending on platform permission semantics.

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::debug;

pub mod mock;

/// What a directory entry is, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path (the listed directory joined with the entry name).
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Read-only filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Kind of the entry at `path`, not following a final symlink.
    /// `None` if nothing is there.
    fn kind(&self, path: &Path) -> Option<EntryKind>;

    /// Last-modified time, following symlinks.
    fn modified(&self, path: &Path) -> Result<SystemTime>;

    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    fn exists(&self, path: &Path) -> bool {
        self.kind(path).is_some()
    }

    /// True for real directories only; a symlink to a directory is not one.
    fn is_dir(&self, path: &Path) -> bool {
        self.kind(path) == Some(EntryKind::Dir)
    }
}

/// `std::fs` backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Box::new(file))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("resolving {}", path.display()))
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        fs::symlink_metadata(path).ok().map(|m| m.file_type().into())
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("reading mtime of {}", path.display()))
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let listing = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
        let entries = readable_entries(dir, listing)
            .map(|entry| DirEntry {
                kind: entry
                    .file_type()
                    .map(EntryKind::from)
                    .unwrap_or(EntryKind::Other),
                path: entry.path(),
            })
            .collect();
        Ok(entries)
    }
}

/// An unreadable entry only costs that entry, not the whole directory.
fn readable_entries<T>(
    dir: &Path,
    listing: impl Iterator<Item = std::io::Result<T>>,
) -> impl Iterator<Item = T> {
    listing.filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            debug!(dir = ?dir, error = %err, "skipping unreadable directory entry");
            None
        }
    })
}
