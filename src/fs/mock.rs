// src/fs/mock.rs

use super::{DirEntry, EntryKind, FileSystem};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    /// `modified == None` simulates a file whose metadata cannot be read.
    File {
        content: Vec<u8>,
        modified: Option<SystemTime>,
    },
    Dir(Vec<String>), // List of child names
}

impl MockEntry {
    fn kind(&self) -> EntryKind {
        match self {
            MockEntry::File { .. } => EntryKind::File,
            MockEntry::Dir(_) => EntryKind::Dir,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock handing out strictly increasing mtimes.
    ticks: u64,
}

impl MockState {
    fn next_mtime(&mut self) -> SystemTime {
        self.ticks += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.ticks)
    }
}

/// In-memory filesystem with deterministic, monotonically increasing mtimes.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Create or overwrite a file; its mtime advances.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        let modified = Some(state.next_mtime());
        Self::insert(&mut state, path.as_ref(), MockEntry::File {
            content: content.into(),
            modified,
        });
    }

    /// Add a file that shows up in directory listings but cannot be stat'd.
    pub fn add_unstatable_file(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        Self::insert(&mut state, path.as_ref(), MockEntry::File {
            content: Vec::new(),
            modified: None,
        });
    }

    /// Bump the mtime of an existing file without changing its content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        let next = state.next_mtime();
        if let Some(MockEntry::File { modified, .. }) = state.entries.get_mut(path.as_ref()) {
            *modified = Some(next);
        }
    }

    /// Remove a file (directories are left alone).
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        if matches!(state.entries.get(path), Some(MockEntry::File { .. })) {
            state.entries.remove(path);
            let parent = parent_or_root(path).to_path_buf();
            if let (Some(MockEntry::Dir(children)), Some(name)) = (
                state.entries.get_mut(&parent),
                path.file_name().and_then(|n| n.to_str()),
            ) {
                children.retain(|c| c != name);
            }
        }
    }

    fn insert(state: &mut MockState, path: &Path, entry: MockEntry) {
        state.entries.insert(path.to_path_buf(), entry);

        // Ensure parent directories exist implicitly for simplicity in this mock
        if path.parent().is_some() {
            let parent = parent_or_root(path);
            Self::ensure_dir_entry(&mut state.entries, parent);
            Self::link_child(&mut state.entries, parent, path);
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if path.parent().is_some() {
            let parent = parent_or_root(path);
            if parent != path {
                // Avoid infinite loop at root
                Self::ensure_dir_entry(entries, parent);
                Self::link_child(entries, parent, path);
            }
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }
}

fn parent_or_root(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File { content, modified: Some(_) }) => {
                Ok(Box::new(Cursor::new(content.clone())))
            }
            Some(MockEntry::File { modified: None, .. }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Paths are taken as already canonical.
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let state = self.state.lock().unwrap();
        state.entries.get(path).map(MockEntry::kind)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File { modified: Some(t), .. }) => Ok(*t),
            Some(MockEntry::File { modified: None, .. }) => {
                Err(anyhow!("Permission denied: {:?}", path))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let state = self.state.lock().unwrap();
        match state.entries.get(dir) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| {
                    let path = dir.join(name);
                    let kind = state
                        .entries
                        .get(&path)
                        .map(MockEntry::kind)
                        .unwrap_or(EntryKind::Other);
                    DirEntry { path, kind }
                })
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", dir)),
        }
    }
}
