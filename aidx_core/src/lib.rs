//! # aidx_core
//!
//! Content-addressed storage for game asset directory trees.
//!
//! An asset tree is kept in *indexed* form: a JSON manifest mapping
//! virtual file paths to BLAKE3 content hashes, next to a flat object
//! store of hash-named files. Identical file content is stored once no
//! matter how many manifests (or virtual paths) reference it, which is
//! how a distribution server avoids duplicating content across asset
//! sets.
//!
//! Two one-shot jobs convert between the forms:
//!
//! - [`index_dir`] walks a named-file tree and produces (manifest,
//!   object store);
//! - [`unindex_dir`] reads (manifest, object store) and reconstructs the
//!   named-file tree.
//!
//! Both jobs finish by telling a [`ChangeNotifier`] which output
//! directory they created, so the server can refresh its integrity
//! metadata.
//!
//! ## Example
//!
//! ```no_run
//! use aidx_core::{index_dir, unindex_dir, LogNotifier};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = LogNotifier;
//!
//! // Index a tree of asset files into ./assets
//! index_dir(Path::new("./raw"), Path::new("./assets"), "indexes", &notifier)?;
//!
//! // Reconstruct the original tree into ./restored
//! unindex_dir(Path::new("./assets"), "indexes", Path::new("./restored"), false, &notifier)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod index;
mod manifest;
mod name;
mod notify;
mod resolve;
mod unindex;

pub use error::{Error, Result};
pub use hash::{Hash, HASH_SIZE};
pub use index::{index_dir, IndexStats};
pub use manifest::{AssetEntry, AssetManifest};
pub use name::verify_file_name;
pub use notify::{ChangeNotifier, LogNotifier, NullNotifier};
pub use resolve::{manifest_path, object_path, OBJECTS_DIR};
pub use unindex::{unindex_dir, UnindexStats};
