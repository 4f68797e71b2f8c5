//! Error types for aidx_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using aidx_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during index/unindex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error{}: {source}", context_suffix(.context))]
    Io {
        source: std::io::Error,
        context: Option<String>,
    },

    /// File or directory name contains forbidden characters.
    #[error("Invalid file name: {name:?} ({reason})")]
    InvalidFileName { name: String, reason: String },

    /// Input and output directories resolve to the same location.
    #[error("Indexed and unindexed asset dirs can't be the same: {path}")]
    SameDirectory { path: PathBuf },

    /// Output directory already exists.
    #[error("Output directory already exists: {path}")]
    OutputExists { path: PathBuf },

    /// Source directory is missing or not a directory.
    #[error("Invalid source directory {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    /// Manifest file not found in the asset directory.
    #[error("Asset manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Manifest is unparseable or missing a required field.
    #[error("Malformed manifest: {reason}")]
    MalformedManifest { reason: String },

    /// A manifest entry references an object absent from the store.
    #[error("Missing object {hash} for '{virtual_path}'")]
    ObjectMissing { hash: String, virtual_path: String },

    /// Recorded entry size disagrees with the copied object (strict mode).
    #[error("Size mismatch for '{virtual_path}': manifest says {expected}, object is {actual}")]
    SizeMismatch {
        virtual_path: String,
        expected: u64,
        actual: u64,
    },

    /// Invalid hash format or encoding.
    #[error("Invalid hash: {reason}")]
    InvalidHash { reason: String },
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(c) => format!(" ({c})"),
        None => String::new(),
    }
}

impl Error {
    /// Wrap an I/O error with the path or entry being processed.
    pub fn io_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Error::Io {
            source,
            context: Some(context.into()),
        }
    }

    /// Create an InvalidFileName error.
    pub fn invalid_file_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidFileName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a SameDirectory error.
    pub fn same_directory(path: impl Into<PathBuf>) -> Self {
        Error::SameDirectory { path: path.into() }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Error::OutputExists { path: path.into() }
    }

    /// Create an InvalidSource error.
    pub fn invalid_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ManifestNotFound error.
    pub fn manifest_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ManifestNotFound { path: path.into() }
    }

    /// Create a MalformedManifest error.
    pub fn malformed_manifest(reason: impl Into<String>) -> Self {
        Error::MalformedManifest {
            reason: reason.into(),
        }
    }

    /// Create an ObjectMissing error.
    pub fn object_missing(hash: impl Into<String>, virtual_path: impl Into<String>) -> Self {
        Error::ObjectMissing {
            hash: hash.into(),
            virtual_path: virtual_path.into(),
        }
    }

    /// Create an InvalidHash error.
    pub fn invalid_hash(reason: impl Into<String>) -> Self {
        Error::InvalidHash {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            source,
            context: None,
        }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io {
            source: err.error,
            context: None,
        }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
                context: None,
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
                context: None,
            },
        }
    }
}
