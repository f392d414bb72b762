//! Registration of content and metadata files.

use std::path::Path;

use tracing::debug;

use super::error::MetsResult;
use super::model::{new_id, FileEntry, FileGroup, MetadataEntry, MetadataSection, MetadataType};
use crate::inspect::{current_timestamp, FileFacts};

/// Turns files below a package root into descriptor entries.
#[derive(Debug, Clone, Copy)]
pub struct FileRegistrar<'a> {
    root: &'a Path,
}

impl<'a> FileRegistrar<'a> {
    /// Create a registrar for a package root.
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Package root that references are relative to.
    pub fn root(&self) -> &Path {
        self.root
    }

    /// Register a content file into `group`, returning its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`](super::MetsError::ReadFailed) if the
    /// file cannot be inspected or hashed.
    pub fn register_file(&self, path: &Path, group: &mut FileGroup) -> MetsResult<String> {
        let facts = FileFacts::collect(path, self.root)?;
        let id = new_id();

        debug!(
            file = %facts.href,
            group = %group.role,
            size = facts.size,
            "Registered file"
        );

        group.entries.push(FileEntry {
            id: id.clone(),
            facts,
            role: group.role,
        });
        Ok(id)
    }

    /// Register a metadata file. `CREATED` is the registration time.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`](super::MetsError::ReadFailed) if the
    /// file cannot be inspected or hashed.
    pub fn register_metadata(
        &self,
        path: &Path,
        section: MetadataSection,
        md_type: MetadataType,
    ) -> MetsResult<MetadataEntry> {
        let mut facts = FileFacts::collect(path, self.root)?;
        facts.created = current_timestamp();

        debug!(file = %facts.href, %section, md_type = md_type.tag(), "Registered metadata");

        Ok(MetadataEntry {
            id: new_id(),
            facts,
            md_type,
            section,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FolderRole;
    use crate::mets::MetsError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_register_file_appends_to_group() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("data")).unwrap();
        let file = temp.path().join("data/a.csv");
        fs::write(&file, "x,y\n").unwrap();

        let registrar = FileRegistrar::new(temp.path());
        let mut group = FileGroup::new(FolderRole::Data);
        let id = registrar.register_file(&file, &mut group).unwrap();

        assert_eq!(group.len(), 1);
        let entry = &group.entries[0];
        assert_eq!(entry.id, id);
        assert_eq!(entry.role, FolderRole::Data);
        assert_eq!(entry.facts.href, "data/a.csv");
        assert_eq!(entry.facts.size, 4);
        assert_eq!(entry.facts.mime_type, "text/csv");
    }

    #[test]
    fn test_register_file_ids_are_unique() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let registrar = FileRegistrar::new(temp.path());
        let mut group = FileGroup::new(FolderRole::Other);
        let first = registrar.register_file(&file, &mut group).unwrap();
        let second = registrar.register_file(&file, &mut group).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_register_metadata_uses_registration_time() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("premis.xml");
        fs::write(&file, "<premis/>").unwrap();

        let registrar = FileRegistrar::new(temp.path());
        let entry = registrar
            .register_metadata(&file, MetadataSection::Provenance, MetadataType::Premis)
            .unwrap();

        assert!(entry.id.starts_with("ID"));
        assert_eq!(entry.facts.href, "premis.xml");
        assert_eq!(entry.facts.created.len(), 19);
        assert!(!entry.facts.created.ends_with('Z'));
        assert_eq!(entry.section, MetadataSection::Provenance);
    }

    #[test]
    fn test_register_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let registrar = FileRegistrar::new(temp.path());
        let mut group = FileGroup::new(FolderRole::Other);

        let result = registrar.register_file(&temp.path().join("nope"), &mut group);
        assert!(matches!(result, Err(MetsError::ReadFailed { .. })));
        assert!(group.is_empty());
    }
}
