//! Unindexing: (manifest, object store) -> named-file tree.

use crate::error::{Error, Result};
use crate::index::singleton_name;
use crate::manifest::AssetManifest;
use crate::notify::ChangeNotifier;
use crate::resolve::{manifest_path, object_path};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of a completed unindex run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnindexStats {
    /// Files restored from the object store.
    pub files: usize,
    /// Total bytes copied.
    pub bytes: u64,
}

/// Reconstruct a named-file tree from an indexed asset directory.
///
/// Reads the manifest named `manifest_name` inside `input_asset_dir`,
/// then copies every referenced object to its virtual path under a
/// freshly created `output_dir`. The input is never mutated.
///
/// Fails before touching the filesystem if input and output resolve to
/// the same location, or if `output_dir` already exists. A missing
/// referenced object aborts the remaining copies; the partial output is
/// left for the caller to discard.
///
/// With `strict` set, each entry's recorded `size` (when present) is
/// checked against the copied byte count.
pub fn unindex_dir(
    input_asset_dir: &Path,
    manifest_name: &str,
    output_dir: &Path,
    strict: bool,
    notifier: &dyn ChangeNotifier,
) -> Result<UnindexStats> {
    // Identity check is spelling-insensitive: different spellings of the
    // same location must still conflict.
    if resolved_identity(input_asset_dir) == resolved_identity(output_dir) {
        return Err(Error::same_directory(output_dir));
    }

    if output_dir.exists() {
        return Err(Error::output_exists(output_dir));
    }

    // Resolve the manifest before creating anything, so a missing index
    // leaves no empty output dir behind.
    let manifest_file = manifest_path(input_asset_dir, manifest_name)?;

    info!(dir = %output_dir.display(), "creating unindexed asset dir");
    fs::create_dir_all(output_dir)?;

    info!(manifest = %manifest_file.display(), "reading asset manifest");
    let manifest = AssetManifest::read(&manifest_file)?;

    info!(objects = manifest.len(), "unindexing objects");
    let mut stats = UnindexStats { files: 0, bytes: 0 };

    for (virtual_path, entry) in &manifest.objects {
        info!(path = %virtual_path, "unindexing");

        let source = object_path(input_asset_dir, &entry.hash);
        if !source.is_file() {
            return Err(Error::object_missing(entry.hash.to_hex(), virtual_path));
        }

        let dest = dest_path(output_dir, virtual_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io_context(e, virtual_path.clone()))?;
        }

        let copied =
            fs::copy(&source, &dest).map_err(|e| Error::io_context(e, virtual_path.clone()))?;

        if strict {
            if let Some(expected) = entry.size {
                if copied != expected {
                    return Err(Error::SizeMismatch {
                        virtual_path: virtual_path.clone(),
                        expected,
                        actual: copied,
                    });
                }
            }
        }

        stats.files += 1;
        stats.bytes += copied;
    }

    notifier.directories_changed(&singleton_name(output_dir));

    info!(files = stats.files, "asset dir successfully unindexed");
    Ok(stats)
}

/// Destination path for a `/`-separated virtual path under the output dir.
fn dest_path(output_dir: &Path, virtual_path: &str) -> PathBuf {
    let mut dest = output_dir.to_path_buf();
    for part in virtual_path.split('/') {
        dest.push(part);
    }
    dest
}

/// Best-effort canonical form of a path for identity comparison.
///
/// The output dir usually does not exist yet, so its parent is
/// canonicalized and the file name re-joined.
fn resolved_identity(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(canonical_parent) => canonical_parent.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}
