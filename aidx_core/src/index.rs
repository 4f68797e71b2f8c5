//! Indexing: named-file tree -> (manifest, object store).

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::manifest::AssetManifest;
use crate::notify::ChangeNotifier;
use crate::resolve::{manifest_file_name, object_path};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Summary of a completed index run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Files recorded in the manifest.
    pub files: usize,
    /// Distinct objects written to the store (after deduplication).
    pub objects: usize,
    /// Total bytes of source content indexed.
    pub bytes: u64,
}

/// Index a named-file directory tree into a fresh asset directory.
///
/// Walks every regular file under `source_dir`, hashes it, copies it to
/// its hash-addressed location under `output_asset_dir`, and records a
/// manifest entry keyed by the file's `/`-separated relative path. The
/// manifest is written only after all objects are in place, so a crashed
/// run leaves orphan objects but never a manifest referencing objects
/// that are not there.
///
/// `output_asset_dir` must not exist; it is created by this call and
/// never merged into prior content. Any read/copy failure aborts the run
/// without writing a manifest.
pub fn index_dir(
    source_dir: &Path,
    output_asset_dir: &Path,
    manifest_name: &str,
    notifier: &dyn ChangeNotifier,
) -> Result<IndexStats> {
    if !source_dir.is_dir() {
        return Err(Error::invalid_source(
            source_dir,
            if source_dir.exists() {
                "not a directory"
            } else {
                "does not exist"
            },
        ));
    }

    if output_asset_dir.exists() {
        return Err(Error::output_exists(output_asset_dir));
    }

    info!(dir = %output_asset_dir.display(), "creating indexed asset dir");
    fs::create_dir_all(output_asset_dir)?;

    let mut manifest = AssetManifest::new();
    let mut stats = IndexStats {
        files: 0,
        objects: 0,
        bytes: 0,
    };

    // Walk everything; asset trees are indexed verbatim, ignore files
    // and hidden entries included.
    let walker = ignore::WalkBuilder::new(source_dir)
        .standard_filters(false)
        .build();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        let metadata = path
            .metadata()
            .map_err(|e| Error::io_context(e, path.display().to_string()))?;
        if !metadata.is_file() {
            continue;
        }

        let virtual_path = virtual_path_of(source_dir, path)?;
        info!(path = %virtual_path, "indexing");

        let hash = Hash::hash_file(path)?;

        let dest = object_path(output_asset_dir, &hash);
        if !dest.exists() {
            copy_object(path, &dest, &virtual_path)?;
            stats.objects += 1;
        }

        stats.files += 1;
        stats.bytes += metadata.len();
        manifest.insert(virtual_path, hash, metadata.len());
    }

    // Commit point: objects first, manifest last.
    let manifest_dest = manifest_file_name(output_asset_dir, manifest_name);
    manifest.write(&manifest_dest)?;

    notifier.directories_changed(&singleton_name(output_asset_dir));

    info!(
        files = stats.files,
        objects = stats.objects,
        "asset dir successfully indexed"
    );
    Ok(stats)
}

/// Relative path of `path` under `root`, joined with `/` regardless of
/// the host separator.
fn virtual_path_of(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::io_context(
            std::io::Error::other("walked path escapes source root"),
            path.display().to_string(),
        )
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            Error::invalid_file_name(path.display().to_string(), "non-UTF-8 file name")
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Copy a source file to its object-store path, atomically.
///
/// Intermediate directories are created with "ignore already-exists"
/// semantics so concurrent creation of the same shard never fails a run.
fn copy_object(source: &Path, dest: &Path, virtual_path: &str) -> Result<()> {
    let parent = dest.parent().ok_or_else(|| {
        Error::io_context(
            std::io::Error::other("object path has no parent"),
            dest.display().to_string(),
        )
    })?;
    fs::create_dir_all(parent)?;

    let mut reader = fs::File::open(source).map_err(|e| Error::io_context(e, virtual_path))?;
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    std::io::copy(&mut reader, &mut temp_file).map_err(|e| Error::io_context(e, virtual_path))?;
    temp_file.flush()?;
    temp_file.persist(dest)?;

    Ok(())
}

/// Single-element set holding the directory's own name.
pub(crate) fn singleton_name(dir: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    names.insert(
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string()),
    );
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NullNotifier, RecordingNotifier};
    use crate::resolve::manifest_path;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }
    }

    #[test]
    fn test_index_simple_tree() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        write_tree(&source, &[("a.txt", b"alpha"), ("sub/b.txt", b"beta")]);

        let output = temp_dir.path().join("assets");
        let stats = index_dir(&source, &output, "indexes", &NullNotifier).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.objects, 2);
        assert_eq!(stats.bytes, 9);

        let manifest_file = manifest_path(&output, "indexes").unwrap();
        let manifest = AssetManifest::read(&manifest_file).unwrap();
        assert_eq!(manifest.len(), 2);

        // Objects are stored at their hash-addressed paths
        let entry = &manifest.objects["a.txt"];
        let obj = object_path(&output, &entry.hash);
        assert_eq!(fs::read(obj).unwrap(), b"alpha");
        assert_eq!(entry.size, Some(5));

        // Virtual paths use '/' for nested files
        assert!(manifest.objects.contains_key("sub/b.txt"));
    }

    #[test]
    fn test_index_dedup_identical_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        write_tree(
            &source,
            &[
                ("a.txt", b"hello"),
                ("sub/b.txt", b"hello"),
                ("c.txt", b"world"),
            ],
        );

        let output = temp_dir.path().join("assets");
        let stats = index_dir(&source, &output, "indexes", &NullNotifier).unwrap();

        // Two identical files share one object
        assert_eq!(stats.files, 3);
        assert_eq!(stats.objects, 2);

        let manifest_file = manifest_path(&output, "indexes").unwrap();
        let manifest = AssetManifest::read(&manifest_file).unwrap();
        assert_eq!(manifest.len(), 3);
        assert_eq!(
            manifest.objects["a.txt"].hash,
            manifest.objects["sub/b.txt"].hash
        );
        assert_ne!(
            manifest.objects["a.txt"].hash,
            manifest.objects["c.txt"].hash
        );
    }

    #[test]
    fn test_index_rejects_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let output = temp_dir.path().join("assets");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("keep.txt"), b"keep").unwrap();

        let result = index_dir(&source, &output, "indexes", &NullNotifier);
        assert!(matches!(result, Err(Error::OutputExists { .. })));

        // Existing content untouched
        assert_eq!(fs::read(output.join("keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn test_index_rejects_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = index_dir(
            &temp_dir.path().join("absent"),
            &temp_dir.path().join("assets"),
            "indexes",
            &NullNotifier,
        );
        assert!(matches!(result, Err(Error::InvalidSource { .. })));
    }

    #[test]
    fn test_index_rejects_file_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("file.txt");
        fs::write(&source, b"not a dir").unwrap();

        let result = index_dir(
            &source,
            &temp_dir.path().join("assets"),
            "indexes",
            &NullNotifier,
        );
        assert!(matches!(result, Err(Error::InvalidSource { .. })));
    }

    #[test]
    fn test_index_empty_tree_writes_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let output = temp_dir.path().join("assets");
        let stats = index_dir(&source, &output, "indexes", &NullNotifier).unwrap();
        assert_eq!(stats.files, 0);

        let manifest_file = manifest_path(&output, "indexes").unwrap();
        let manifest = AssetManifest::read(&manifest_file).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_index_notifies_output_dir_name() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        write_tree(&source, &[("a.txt", b"alpha")]);

        let notifier = RecordingNotifier::new();
        let output = temp_dir.path().join("assets");
        index_dir(&source, &output, "indexes", &notifier).unwrap();

        let calls = notifier.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0].contains("assets"));
    }

    #[test]
    fn test_index_includes_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir(&source).unwrap();
        write_tree(&source, &[(".hidden", b"secret"), ("visible.txt", b"seen")]);

        let output = temp_dir.path().join("assets");
        let stats = index_dir(&source, &output, "indexes", &NullNotifier).unwrap();
        assert_eq!(stats.files, 2);

        let manifest_file = manifest_path(&output, "indexes").unwrap();
        let manifest = AssetManifest::read(&manifest_file).unwrap();
        assert!(manifest.objects.contains_key(".hidden"));
    }
}
