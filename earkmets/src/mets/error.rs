//! Error types for descriptor generation, linking and reading.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::xml::XmlError;

/// Result type for descriptor operations.
pub type MetsResult<T> = Result<T, MetsError>;

/// Fatal errors of descriptor operations.
///
/// Per-file classification gaps are not errors; they are collected in the
/// generation report instead.
#[derive(Debug, Error)]
pub enum MetsError {
    /// A required configuration option is missing or empty.
    #[error("missing required option '{0}'")]
    MissingOption(&'static str),

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The package root does not exist or is not a directory.
    #[error("package root not found: {}", .0.display())]
    PackageRootNotFound(PathBuf),

    /// The schema folder exists but cannot be listed.
    #[error("schema folder {} is unreadable: {source}", path.display())]
    SchemaFolderUnreadable { path: PathBuf, source: io::Error },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// A descriptor could not be parsed or serialized.
    #[error("invalid XML in {}: {source}", path.display())]
    Xml { path: PathBuf, source: XmlError },

    /// A descriptor parsed but lacks required structure.
    #[error("invalid descriptor {}: {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// A reader accessor was used before a descriptor was loaded.
    #[error("no descriptor loaded")]
    NotLoaded,
}

impl MetsError {
    /// Wrap a directory walk failure, attributing it to `fallback` when the
    /// walker does not name a path.
    pub(crate) fn from_walk(err: walkdir::Error, fallback: &Path) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback.to_path_buf());
        MetsError::ReadFailed {
            path,
            source: io::Error::from(err),
        }
    }
}
