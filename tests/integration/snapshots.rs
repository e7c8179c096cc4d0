use std::sync::Arc;

use relaunch::fs::RealFileSystem;
use relaunch::types::ChangeDetection;
use relaunch::watch::{FileStamp, Snapshotter, WatchFilter};

use relaunch_test_utils::{FixtureTree, init_tracing};

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

fn snapshotter(tree: &FixtureTree, mode: ChangeDetection) -> Snapshotter {
    Snapshotter::new(Arc::new(RealFileSystem), tree.root(), WatchFilter::default(), mode)
}

#[test]
fn only_watched_extensions_are_recorded() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("main.rs", "");
    tree.write("nested/deeper/mod.rs", "");
    tree.write("README.md", "");
    tree.write("target/debug/out.rs", "");
    tree.write(".git/hooks/pre-commit.rs", "");

    let snap = snapshotter(&tree, ChangeDetection::Mtime).take();
    let paths: Vec<_> = snap.paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(
        paths,
        vec![tree.path("main.rs"), tree.path("nested/deeper/mod.rs")]
    );
}

#[test]
fn touching_a_watched_file_changes_the_snapshot() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("main.rs", "fn main() {}");
    tree.write("notes.txt", "");
    let snapshotter = snapshotter(&tree, ChangeDetection::Mtime);

    let before = snapshotter.take();
    tree.touch("notes.txt");
    assert_eq!(before, snapshotter.take());

    tree.touch("main.rs");
    let after = snapshotter.take();
    assert_ne!(before, after);
    assert_eq!(before.diff(&after).modified, vec![tree.path("main.rs")]);
}

#[test]
fn added_and_removed_files_are_changes() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("a.rs", "");
    tree.write("b.rs", "");
    let snapshotter = snapshotter(&tree, ChangeDetection::Mtime);

    let before = snapshotter.take();
    tree.remove("a.rs");
    tree.write("c.rs", "");
    let diff = before.diff(&snapshotter.take());

    assert_eq!(diff.added, vec![tree.path("c.rs")]);
    assert_eq!(diff.removed, vec![tree.path("a.rs")]);
    assert!(diff.modified.is_empty());
}

#[test]
fn hash_mode_ignores_mtime_only_changes() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("lib.rs", "pub fn one() {}");
    let snapshotter = snapshotter(&tree, ChangeDetection::Hash);

    let before = snapshotter.take();
    assert!(matches!(
        before.get(&tree.path("lib.rs")),
        Some(FileStamp::Content(_))
    ));

    tree.touch("lib.rs");
    assert_eq!(before, snapshotter.take());

    tree.write("lib.rs", "pub fn two() {}");
    assert_ne!(before, snapshotter.take());
}

#[test]
fn custom_extensions_and_excludes() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("templates/index.html", "");
    tree.write("templates/generated/cache.html", "");
    tree.write("src/main.rs", "");

    let filter = WatchFilter::new(&strings(&["html"]), &strings(&["templates/generated/**"])).unwrap();
    let snap = Snapshotter::new(
        Arc::new(RealFileSystem),
        tree.root(),
        filter,
        ChangeDetection::Mtime,
    )
    .take();

    let paths: Vec<_> = snap.paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(paths, vec![tree.path("templates/index.html")]);
}

#[test]
fn missing_root_gives_empty_snapshot() {
    init_tracing();
    let tree = FixtureTree::new();
    let snap = Snapshotter::new(
        Arc::new(RealFileSystem),
        tree.path("gone"),
        WatchFilter::default(),
        ChangeDetection::Mtime,
    )
    .take();
    assert!(snap.is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    init_tracing();
    let tree = FixtureTree::new();
    tree.write("real/lib.rs", "");
    std::os::unix::fs::symlink(tree.path("real"), tree.path("link")).unwrap();
    // A cycle back to the root.
    std::os::unix::fs::symlink(tree.root(), tree.path("real/up")).unwrap();

    let snap = snapshotter(&tree, ChangeDetection::Mtime).take();
    let paths: Vec<_> = snap.paths().map(|p| p.to_path_buf()).collect();
    assert_eq!(paths, vec![tree.path("real/lib.rs")]);
}
