// src/watch/hash.rs

use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;

use crate::fs::FileSystem;

/// blake3 digest of a file's contents, as lowercase hex.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let reader = fs.open_read(path)?;
    let digest = Hasher::new()
        .update_reader(reader)
        .with_context(|| format!("hashing {}", path.display()))?
        .finalize();
    Ok(digest.to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn hashes_known_content() {
        let fs = MockFileSystem::new();
        fs.add_file("./hello.rs", b"hello world".to_vec());

        let hash = compute_file_hash(&fs, Path::new("./hello.rs")).unwrap();
        // blake3 hash of "hello world"
        assert_eq!(
            hash,
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(compute_file_hash(&fs, Path::new("./nope.rs")).is_err());
    }
}
