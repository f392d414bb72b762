//! Batch discovery of descriptors below a base directory.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::mets::{DescriptorReader, MetsError, MetsResult};

/// Pattern a file path must match to count as a descriptor.
pub const DESCRIPTOR_PATTERN: &str = r".*METS\.xml$";

fn descriptor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DESCRIPTOR_PATTERN).unwrap())
}

/// Whether a path names a descriptor file.
pub fn is_descriptor_path(path: &Path) -> bool {
    descriptor_pattern().is_match(&path.to_string_lossy())
}

/// Every descriptor file below `base`, sorted by path.
///
/// # Errors
///
/// Returns [`MetsError::ReadFailed`] if a directory cannot be listed.
pub fn find_descriptors(base: &Path) -> MetsResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.map_err(|e| MetsError::from_walk(e, base))?;
        if entry.file_type().is_file() && is_descriptor_path(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found.sort();

    debug!(base = %base.display(), count = found.len(), "Found descriptors");
    Ok(found)
}

/// Object identifier of one descriptor file.
///
/// # Errors
///
/// Returns [`MetsError::ReadFailed`] or [`MetsError::Xml`] if the
/// descriptor cannot be read or parsed.
pub fn descriptor_object_id(path: &Path) -> MetsResult<String> {
    DescriptorReader::open(path)?.object_id()
}

/// Object identifiers of every descriptor below `base`.
///
/// Descriptors that cannot be parsed are logged and left out.
///
/// # Errors
///
/// Returns [`MetsError::ReadFailed`] if a directory cannot be listed.
pub fn object_ids(base: &Path) -> MetsResult<Vec<String>> {
    let mut ids = Vec::new();
    for path in find_descriptors(base)? {
        match descriptor_object_id(&path) {
            Ok(id) => ids.push(id),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable descriptor"),
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn descriptor(id: &str) -> String {
        format!(
            "<mets xmlns=\"http://www.loc.gov/METS/\" OBJID=\"{}\" TYPE=\"Databases\"/>",
            id
        )
    }

    #[test]
    fn test_pattern() {
        assert!(is_descriptor_path(Path::new("/a/b/METS.xml")));
        assert!(is_descriptor_path(Path::new("/a/b/rep1_METS.xml")));
        assert!(!is_descriptor_path(Path::new("/a/b/METS.xml.bak")));
        assert!(!is_descriptor_path(Path::new("/a/b/mets.xml")));
        assert!(!is_descriptor_path(Path::new("/a/b/METSxxml")));
    }

    #[test]
    fn test_find_descriptors_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b/representations/rep1")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("b/METS.xml"), descriptor("urn:uuid:b")).unwrap();
        fs::write(root.join("b/representations/rep1/METS.xml"), descriptor("urn:uuid:r")).unwrap();
        fs::write(root.join("a/METS.xml"), descriptor("urn:uuid:a")).unwrap();
        fs::write(root.join("a/notes.txt"), "x").unwrap();

        let found = find_descriptors(root).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("a/METS.xml"),
                root.join("b/METS.xml"),
                root.join("b/representations/rep1/METS.xml"),
            ]
        );
    }

    #[test]
    fn test_object_ids_skip_broken() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/METS.xml"), descriptor("urn:uuid:a")).unwrap();
        fs::write(root.join("b/METS.xml"), "<mets>").unwrap();

        assert_eq!(object_ids(root).unwrap(), vec!["urn:uuid:a".to_string()]);
        assert_eq!(
            descriptor_object_id(&root.join("a/METS.xml")).unwrap(),
            "urn:uuid:a"
        );
    }

    #[test]
    fn test_missing_base() {
        let result = find_descriptors(Path::new("/nonexistent/base"));
        assert!(matches!(result, Err(MetsError::ReadFailed { .. })));
    }
}
