//! Path resolution for objects and manifests.
//!
//! Both resolvers are free functions so they stay trivially testable and
//! safe to share across workers. `object_path` never touches the
//! filesystem; `manifest_path` checks for existence because a missing
//! manifest is a caller-facing error, not a path to be created.

use crate::error::{Error, Result};
use crate::hash::Hash;
use std::path::{Path, PathBuf};

/// Directory under an asset dir that holds hash-named objects.
pub const OBJECTS_DIR: &str = "objects";

/// Resolve the object-store path for a hash.
///
/// Returns `{store_root}/objects/{prefix}/{hex}` where `prefix` is the
/// first 2 hex characters. Pure: distinct hashes map to distinct paths,
/// and repeated calls for a hash always return the same path.
pub fn object_path(store_root: &Path, hash: &Hash) -> PathBuf {
    store_root
        .join(OBJECTS_DIR)
        .join(hash.prefix())
        .join(hash.to_hex())
}

/// Resolve the manifest file within an asset directory.
///
/// The `.json` extension is appended when the given name lacks it.
/// Fails with `ManifestNotFound` if the file does not exist.
pub fn manifest_path(asset_dir: &Path, manifest_name: &str) -> Result<PathBuf> {
    let path = manifest_file_name(asset_dir, manifest_name);
    if !path.is_file() {
        return Err(Error::manifest_not_found(path));
    }
    Ok(path)
}

/// Build the manifest path without checking existence (used when writing).
pub fn manifest_file_name(asset_dir: &Path, manifest_name: &str) -> PathBuf {
    if manifest_name.ends_with(".json") {
        asset_dir.join(manifest_name)
    } else {
        asset_dir.join(format!("{manifest_name}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_object_path_layout() {
        let hash = Hash::hash_bytes(b"test");
        let path = object_path(Path::new("/store"), &hash);

        let expected = format!("/store/objects/{}/{}", hash.prefix(), hash.to_hex());
        assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn test_object_path_stable() {
        let hash = Hash::hash_bytes(b"stable");
        let a = object_path(Path::new("root"), &hash);
        let b = object_path(Path::new("root"), &hash);
        assert_eq!(a, b);
    }

    #[test]
    fn test_object_path_distinct_hashes() {
        let root = Path::new("root");
        let a = object_path(root, &Hash::hash_bytes(b"a"));
        let b = object_path(root, &Hash::hash_bytes(b"b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_manifest_path_appends_extension() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("indexes.json"), b"{}").unwrap();

        let resolved = manifest_path(temp_dir.path(), "indexes").unwrap();
        assert_eq!(resolved, temp_dir.path().join("indexes.json"));

        // Explicit extension resolves to the same file
        let explicit = manifest_path(temp_dir.path(), "indexes.json").unwrap();
        assert_eq!(explicit, resolved);
    }

    #[test]
    fn test_manifest_path_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = manifest_path(temp_dir.path(), "absent");
        assert!(matches!(result, Err(Error::ManifestNotFound { .. })));
    }
}
