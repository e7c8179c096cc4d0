// src/watch/filter.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Extensions watched when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["rs"];

/// Root-relative globs skipped when nothing else is configured.
pub const DEFAULT_EXCLUDES: &[&str] = &["target/**", ".git/**"];

/// Compiled predicate deciding which files belong in a snapshot.
///
/// A file is watched when its extension is in the suffix set and its path,
/// relative to the watch root, matches none of the exclude globs.
#[derive(Clone)]
pub struct WatchFilter {
    extensions: Vec<String>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl Default for WatchFilter {
    fn default() -> Self {
        let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        let excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        // The built-in globs are known to compile.
        Self::new(&extensions, &excludes).unwrap_or(Self {
            extensions,
            exclude_set: None,
        })
    }
}

impl WatchFilter {
    /// Build a filter. Leading dots on extensions are ignored (`.rs` == `rs`).
    pub fn new(extensions: &[String], excludes: &[String]) -> Result<Self> {
        let extensions = extensions
            .iter()
            .map(|e| normalize_extension(e))
            .filter(|e| !e.is_empty())
            .collect();

        let exclude_set = if excludes.is_empty() {
            None
        } else {
            Some(build_globset(excludes).context("building exclude globset")?)
        };

        Ok(Self {
            extensions,
            exclude_set,
        })
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether a file at `rel_path` (relative to the watch root) is watched.
    pub fn matches_file(&self, rel_path: &Path) -> bool {
        let ext_ok = rel_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|w| w == ext));
        ext_ok && !self.is_excluded(rel_path)
    }

    /// Whether `rel_path` (file or directory) falls under an exclude glob.
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        match &self.exclude_set {
            Some(set) => {
                let rel = rel_path.to_string_lossy().replace('\\', "/");
                // `target/**` should also prune the `target` directory itself.
                set.is_match(&rel) || set.is_match(format!("{rel}/"))
            }
            None => false,
        }
    }
}

/// Strip surrounding whitespace and a leading `.` (or `*.`) from an extension.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    let ext = ext.strip_prefix('*').unwrap_or(ext);
    ext.strip_prefix('.').unwrap_or(ext).to_string()
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
