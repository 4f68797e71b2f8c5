//! Asset manifest model and JSON codec.
//!
//! A manifest maps virtual paths (the original relative file paths,
//! `/`-separated) to content hashes in the object store:
//!
//! ```json
//! {
//!   "objects": {
//!     "icons/icon_16x16.png": { "hash": "bdf48ef6...", "size": 3665 }
//!   }
//! }
//! ```
//!
//! Unknown top-level and per-entry keys are ignored so newer producers
//! stay readable. `hash` is required; `size` is informational.

use crate::error::{Error, Result};
use crate::hash::Hash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// One manifest entry: the content hash of a virtual path, plus its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Content digest of the referenced object.
    pub hash: Hash,
    /// Size of the original file in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// The manifest document: a key-unique mapping over one object store.
///
/// Iteration order carries no meaning; entries are mutually independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub objects: HashMap<String, AssetEntry>,
}

impl AssetManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry for a virtual path.
    pub fn insert(&mut self, virtual_path: String, hash: Hash, size: u64) {
        self.objects.insert(
            virtual_path,
            AssetEntry {
                hash,
                size: Some(size),
            },
        );
    }

    /// Number of entries in the manifest.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Read a manifest from a JSON file.
    ///
    /// Unparseable JSON and missing required fields surface as
    /// `MalformedManifest`.
    pub fn read(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .map_err(|e| Error::io_context(e, path.display().to_string()))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| Error::malformed_manifest(e.to_string()))
    }

    /// Write the manifest to a JSON file, atomically.
    ///
    /// The document is staged in a temp file next to the target and
    /// persisted in one rename, so a crash mid-write never leaves a
    /// half-written manifest behind.
    pub fn write(&self, path: &Path) -> Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;

        serde_json::to_writer_pretty(&mut temp_file, self)
            .map_err(|e| Error::io_context(std::io::Error::other(e), path.display().to_string()))?;
        temp_file.flush()?;

        temp_file.persist(path)?;
        Ok(())
    }
}
