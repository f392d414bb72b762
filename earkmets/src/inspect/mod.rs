//! File facts recorded in a descriptor.
//!
//! Collects what the descriptor says about a single file: relative reference,
//! media type, checksum, size and creation time. The actual hashing, media
//! type lookup and timestamp formatting live in the submodules.

mod checksum;
mod media_type;
mod timestamp;

use std::fs;
use std::path::{Component, Path, PathBuf};

pub use checksum::sha256_file;
pub use media_type::guess_media_type;
pub use timestamp::{
    current_timestamp, file_created_timestamp, format_system_time, ISO_SECONDS, ISO_SECONDS_UTC,
};

use crate::mets::{MetsError, MetsResult};

/// Facts about one file inside a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFacts {
    /// Path relative to the package root, `/` separated.
    pub href: String,

    /// Guessed media type.
    pub mime_type: String,

    /// Lowercase hex SHA-256 digest.
    pub checksum: String,

    /// Size in bytes.
    pub size: u64,

    /// Creation timestamp of the file.
    pub created: String,
}

impl FileFacts {
    /// Collect facts for `path`, relative to the package `root`.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`] if the file vanished or cannot be
    /// read; a descriptor cannot be produced from a broken file.
    pub fn collect(path: &Path, root: &Path) -> MetsResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| MetsError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            href: relative_href(path, root),
            mime_type: guess_media_type(path).to_string(),
            checksum: sha256_file(path)?,
            size: metadata.len(),
            created: file_created_timestamp(&metadata),
        })
    }
}

/// Relative reference from `base` to `path`, `/` separated.
///
/// Both paths are compared lexically; `..` segments are emitted when `path`
/// lies outside `base`.
pub fn relative_href(path: &Path, base: &Path) -> String {
    let relative = relative_path(path, base);
    let segments: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Lexical relative path from `base` to `path`.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix(base) {
        return stripped.to_path_buf();
    }

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_facts() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir(&data).unwrap();
        let file = data.join("report.pdf");
        fs::write(&file, b"hello world").unwrap();

        let facts = FileFacts::collect(&file, temp.path()).unwrap();

        assert_eq!(facts.href, "data/report.pdf");
        assert_eq!(facts.mime_type, "application/pdf");
        assert_eq!(facts.size, 11);
        assert_eq!(
            facts.checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(facts.created.len(), 20);
    }

    #[test]
    fn test_collect_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = FileFacts::collect(&temp.path().join("gone.txt"), temp.path());
        assert!(matches!(result, Err(MetsError::ReadFailed { .. })));
    }

    #[test]
    fn test_relative_href_inside() {
        assert_eq!(
            relative_href(Path::new("/pkg/schemas/mets.xsd"), Path::new("/pkg")),
            "schemas/mets.xsd"
        );
        assert_eq!(relative_href(Path::new("/pkg"), Path::new("/pkg")), ".");
    }

    #[test]
    fn test_relative_href_outside() {
        assert_eq!(
            relative_href(Path::new("/shared/schemas/mets.xsd"), Path::new("/pkg/aip")),
            "../../shared/schemas/mets.xsd"
        );
    }
}
