//! Reading facts back from an existing descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::error::{MetsError, MetsResult};
use crate::profile::{METS_NS, XLINK_NS, XSI_NS};
use crate::xml::{parse_document, Element, Namespaces};

/// Object identifier reported when `OBJID` is absent or ambiguous.
pub const NO_OBJECT_ID: &str = "urn:uuid:none";

/// Package type reported when `TYPE` is absent or ambiguous.
pub const NO_PACKAGE_TYPE: &str = "NONE";

#[derive(Debug, Clone)]
struct LoadedDocument {
    root: Element,
    namespaces: Namespaces,
}

/// Reads identifiers, checksums and references from a descriptor.
///
/// Accessors fail with [`MetsError::NotLoaded`] until a document has been
/// loaded.
#[derive(Debug, Clone)]
pub struct DescriptorReader {
    root_dir: PathBuf,
    document: Option<LoadedDocument>,
}

impl DescriptorReader {
    /// Create a reader. `root_dir` is the package root that schema locations
    /// are resolved against.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            document: None,
        }
    }

    /// Open a descriptor, using its directory as package root.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn open(path: &Path) -> MetsResult<Self> {
        let root_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut reader = Self::new(root_dir);
        reader.load(path)?;
        Ok(reader)
    }

    /// Package root used for schema locations.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Parse a descriptor file, replacing any loaded document.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`] if the file cannot be read and
    /// [`MetsError::Xml`] if it is not well-formed.
    pub fn load(&mut self, path: &Path) -> MetsResult<()> {
        let content = fs::read_to_string(path).map_err(|e| MetsError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root = parse_document(&content).map_err(|e| MetsError::Xml {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), "Loaded descriptor");
        self.set_document(root);
        Ok(())
    }

    /// Use an already parsed document.
    pub fn set_document(&mut self, root: Element) {
        let namespaces = Namespaces::from_element(&root);
        self.document = Some(LoadedDocument { root, namespaces });
    }

    /// Whether a document is loaded.
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn document(&self) -> MetsResult<&LoadedDocument> {
        self.document.as_ref().ok_or(MetsError::NotLoaded)
    }

    /// Root element of the loaded document.
    pub fn root(&self) -> MetsResult<&Element> {
        Ok(&self.document()?.root)
    }

    /// `OBJID` of the root, or [`NO_OBJECT_ID`].
    pub fn object_id(&self) -> MetsResult<String> {
        Ok(single_attr(&self.document()?.root, "OBJID")
            .unwrap_or(NO_OBJECT_ID)
            .to_string())
    }

    /// `TYPE` of the root, or [`NO_PACKAGE_TYPE`].
    pub fn package_type(&self) -> MetsResult<String> {
        Ok(single_attr(&self.document()?.root, "TYPE")
            .unwrap_or(NO_PACKAGE_TYPE)
            .to_string())
    }

    /// Every `fileSec/fileGrp/file` in document order.
    pub fn file_entries(&self) -> MetsResult<Vec<FileEntryRef<'_>>> {
        let document = self.document()?;
        let namespaces = &document.namespaces;

        let entries = document
            .root
            .elements()
            .filter(|e| namespaces.is_element(e, METS_NS, "fileSec"))
            .flat_map(|section| section.elements())
            .filter(|e| namespaces.is_element(e, METS_NS, "fileGrp"))
            .flat_map(|group| group.elements())
            .filter(|e| namespaces.is_element(e, METS_NS, "file"))
            .map(|element| FileEntryRef {
                element,
                namespaces,
            })
            .collect();
        Ok(entries)
    }

    /// First file entry, if any.
    pub fn first_file_entry(&self) -> MetsResult<Option<FileEntryRef<'_>>> {
        Ok(self.file_entries()?.into_iter().next())
    }

    /// METS schema file, resolved against the package root.
    ///
    /// Returns `None` when `xsi:schemaLocation` does not name the METS
    /// namespace or names it without a location. [`summary`](Self::summary)
    /// reports that case as an empty string.
    pub fn schema_location(&self) -> MetsResult<Option<PathBuf>> {
        let document = self.document()?;
        let root = &document.root;
        let Some(value) = document.namespaces.attr(root, XSI_NS, "schemaLocation") else {
            return Ok(None);
        };

        let mut tokens = value.split_whitespace();
        let location = tokens
            .by_ref()
            .position(|token| token == METS_NS)
            .and_then(|_| tokens.next());
        Ok(location.map(|location| self.root_dir.join(location)))
    }

    /// Everything the reader knows, for reporting.
    pub fn summary(&self) -> MetsResult<DescriptorSummary> {
        Ok(DescriptorSummary {
            object_id: self.object_id()?,
            package_type: self.package_type()?,
            schema_location: self
                .schema_location()?
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            files: self
                .file_entries()?
                .iter()
                .map(FileEntryRef::summary)
                .collect(),
        })
    }
}

/// Value of an attribute that occurs exactly once.
fn single_attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    match element.attr_values(name).as_slice() {
        [value] => Some(*value),
        _ => None,
    }
}

/// A `file` element of a loaded descriptor.
#[derive(Debug, Clone, Copy)]
pub struct FileEntryRef<'a> {
    element: &'a Element,
    namespaces: &'a Namespaces,
}

impl<'a> FileEntryRef<'a> {
    /// Underlying element.
    pub fn element(&self) -> &'a Element {
        self.element
    }

    /// `ID` attribute, empty when absent.
    pub fn id(&self) -> String {
        self.element.attr("ID").unwrap_or_default().to_string()
    }

    /// `CHECKSUM` attribute, empty when absent.
    pub fn checksum(&self) -> String {
        self.element.attr("CHECKSUM").unwrap_or_default().to_string()
    }

    /// `CHECKSUMTYPE` attribute, empty when absent.
    pub fn checksum_algorithm(&self) -> String {
        self.element
            .attr("CHECKSUMTYPE")
            .unwrap_or_default()
            .to_string()
    }

    /// `xlink:href` of the `FLocat` child, empty when absent.
    pub fn reference(&self) -> String {
        self.element
            .elements()
            .find(|e| self.namespaces.is_element(e, METS_NS, "FLocat"))
            .and_then(|location| self.namespaces.attr(location, XLINK_NS, "href"))
            .unwrap_or_default()
            .to_string()
    }

    fn summary(&self) -> FileEntrySummary {
        FileEntrySummary {
            id: self.id(),
            checksum: self.checksum(),
            checksum_algorithm: self.checksum_algorithm(),
            reference: self.reference(),
        }
    }
}

/// Serializable facts of one file entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntrySummary {
    pub id: String,
    pub checksum: String,
    pub checksum_algorithm: String,
    pub reference: String,
}

/// Serializable facts of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorSummary {
    pub object_id: String,
    pub package_type: String,
    /// Empty when the descriptor names no METS schema location.
    pub schema_location: String,
    pub files: Vec<FileEntrySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mets xmlns="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink"
      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
      OBJID="urn:uuid:abc" TYPE="Databases"
      xsi:schemaLocation="http://www.loc.gov/METS/ schemas/mets.xsd http://www.w3.org/1999/xlink https://www.w3.org/1999/xlink.xsd">
  <fileSec ID="IDsec">
    <fileGrp ID="IDgrp" USE="data">
      <file ID="IDf1" CHECKSUMTYPE="SHA-256" CHECKSUM="aaa">
        <FLocat xlink:href="data/a.txt" LOCTYPE="URL" xlink:type="simple"/>
      </file>
      <file ID="IDf2"/>
    </fileGrp>
  </fileSec>
</mets>
"#;

    fn reader(content: &str) -> DescriptorReader {
        let mut reader = DescriptorReader::new("/pkg");
        reader.set_document(parse_document(content).unwrap());
        reader
    }

    #[test]
    fn test_accessors_before_load() {
        let reader = DescriptorReader::new("/pkg");
        assert!(!reader.is_loaded());
        assert!(matches!(reader.object_id(), Err(MetsError::NotLoaded)));
        assert!(matches!(reader.file_entries(), Err(MetsError::NotLoaded)));
        assert!(matches!(reader.schema_location(), Err(MetsError::NotLoaded)));
    }

    #[test]
    fn test_identifier_and_type() {
        let reader = reader(DESCRIPTOR);
        assert_eq!(reader.object_id().unwrap(), "urn:uuid:abc");
        assert_eq!(reader.package_type().unwrap(), "Databases");
    }

    #[test]
    fn test_sentinels() {
        let reader = reader("<mets xmlns=\"http://www.loc.gov/METS/\"/>");
        assert_eq!(reader.object_id().unwrap(), "urn:uuid:none");
        assert_eq!(reader.package_type().unwrap(), "NONE");
        assert!(reader.first_file_entry().unwrap().is_none());
        assert_eq!(reader.schema_location().unwrap(), None);
    }

    #[test]
    fn test_ambiguous_identifier_is_sentinel() {
        let reader = reader("<mets OBJID=\"a\" OBJID=\"b\"/>");
        assert_eq!(reader.object_id().unwrap(), NO_OBJECT_ID);
    }

    #[test]
    fn test_file_entries() {
        let reader = reader(DESCRIPTOR);
        let entries = reader.file_entries().unwrap();
        assert_eq!(entries.len(), 2);

        let first = reader.first_file_entry().unwrap().unwrap();
        assert_eq!(first.checksum(), "aaa");
        assert_eq!(first.checksum_algorithm(), "SHA-256");
        assert_eq!(first.reference(), "data/a.txt");

        assert_eq!(entries[1].id(), "IDf2");
        assert_eq!(entries[1].checksum(), "");
        assert_eq!(entries[1].reference(), "");
    }

    #[test]
    fn test_schema_location() {
        let reader = reader(DESCRIPTOR);
        assert_eq!(
            reader.schema_location().unwrap(),
            Some(PathBuf::from("/pkg/schemas/mets.xsd"))
        );
    }

    #[test]
    fn test_schema_location_without_mets_token() {
        let reader = reader(
            "<mets xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"http://www.w3.org/1999/xlink xlink.xsd\"/>",
        );
        assert_eq!(reader.schema_location().unwrap(), None);
        assert_eq!(reader.summary().unwrap().schema_location, "");
    }

    #[test]
    fn test_summary_serializes() {
        let summary = reader(DESCRIPTOR).summary().unwrap();
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.files[0].reference, "data/a.txt");
        assert_eq!(summary.schema_location, "/pkg/schemas/mets.xsd");
    }

    #[test]
    fn test_open_uses_parent_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("METS.xml");
        fs::write(&path, DESCRIPTOR).unwrap();

        let reader = DescriptorReader::open(&path).unwrap();
        assert_eq!(reader.root_dir(), temp.path());
        assert_eq!(
            reader.schema_location().unwrap(),
            Some(temp.path().join("schemas/mets.xsd"))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let mut reader = DescriptorReader::new("/pkg");
        let result = reader.load(Path::new("/nonexistent/METS.xml"));
        assert!(matches!(result, Err(MetsError::ReadFailed { .. })));
        assert!(!reader.is_loaded());
    }
}
