//! Shared helpers for relaunch's integration tests.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use relaunch::exec::ChildCommand;
use tempfile::TempDir;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs go through `with_test_writer()`, so they only show up for failing
/// tests (or with `-- --nocapture`). Override the level with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("relaunch=debug,info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// `/bin/sh -c <script>` as a supervised child.
pub fn sh(script: &str) -> ChildCommand {
    ChildCommand::new("/bin/sh").arg("-c").arg(script)
}

/// A throwaway directory tree to watch.
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Canonical root, matching what the supervisor watches.
    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).expect("canonicalize temp dir")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Create (or overwrite) `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Push the mtime of `rel` one second forward.
    ///
    /// Deterministic regardless of filesystem timestamp granularity.
    pub fn touch(&self, rel: &str) {
        touch_path(&self.path(rel));
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).expect("remove fixture file");
    }
}

impl Default for FixtureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Push the mtime of `path` one second forward.
pub fn touch_path(path: &Path) {
    let current = fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("read mtime");
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .expect("open fixture file for touch");
    file.set_modified(current + Duration::from_secs(1))
        .expect("set mtime");
}
