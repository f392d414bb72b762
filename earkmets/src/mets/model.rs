//! In-memory model of a descriptor.
//!
//! The generator assembles a [`Descriptor`] completely before anything is
//! serialized. Structural-map pointers reference entries by identifier only;
//! entries are owned by their file group or metadata record.

use std::fmt;

use uuid::Uuid;

use crate::classify::FolderRole;
use crate::inspect::FileFacts;
use crate::profile::ID_PREFIX;

/// Generate a fresh descriptor identifier (`ID` + UUIDv4).
pub fn new_id() -> String {
    format!("{}{}", ID_PREFIX, Uuid::new_v4())
}

/// A registered content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: String,
    pub facts: FileFacts,
    /// Role of the owning file group.
    pub role: FolderRole,
}

/// Which metadata section an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataSection {
    /// Discovery metadata (`dmdSec`).
    Descriptive,
    /// History, fixity and processing events (`amdSec/digiprovMD`).
    Provenance,
}

impl fmt::Display for MetadataSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataSection::Descriptive => f.write_str("descriptive"),
            MetadataSection::Provenance => f.write_str("provenance"),
        }
    }
}

/// `MDTYPE` of a metadata reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataType {
    Premis,
    Other,
}

impl MetadataType {
    /// Attribute value.
    pub fn tag(&self) -> &'static str {
        match self {
            MetadataType::Premis => "PREMIS",
            MetadataType::Other => "OTHER",
        }
    }

    /// Type of a provenance file, recognised by its name.
    pub fn for_provenance_file(file_name: &str) -> Self {
        if file_name.starts_with("premis") || file_name.ends_with("premis.xml") {
            MetadataType::Premis
        } else {
            MetadataType::Other
        }
    }
}

/// A registered metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub id: String,
    pub facts: FileFacts,
    pub md_type: MetadataType,
    pub section: MetadataSection,
}

/// A metadata entry wrapped in its own `dmdSec` or `digiprovMD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub section_id: String,
    pub created: String,
    pub entry: MetadataEntry,
}

/// Files sharing a folder role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub id: String,
    pub role: FolderRole,
    pub entries: Vec<FileEntry>,
}

impl FileGroup {
    /// Create an empty group for a role.
    pub fn new(role: FolderRole) -> Self {
        Self {
            id: new_id(),
            role,
            entries: Vec::new(),
        }
    }

    /// Whether any file was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A structural-map pointer node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pointer {
    /// `fptr` to a registered file or metadata entry.
    File { file_id: String },

    /// `mptr` to the descriptor of a nested package, by relative URL.
    Package {
        id: String,
        href: String,
        title: String,
    },

    /// `mptr` to a related package, by identifier.
    Related {
        id: String,
        href: String,
        title: String,
    },
}

impl Pointer {
    /// Pointer to a registered entry.
    pub fn file(file_id: impl Into<String>) -> Self {
        Pointer::File {
            file_id: file_id.into(),
        }
    }

    /// Referenced entry identifier, for file pointers.
    pub fn file_id(&self) -> Option<&str> {
        match self {
            Pointer::File { file_id } => Some(file_id.as_str()),
            _ => None,
        }
    }

    /// Whether this points at another package's descriptor.
    pub fn is_package_reference(&self) -> bool {
        matches!(self, Pointer::Package { .. } | Pointer::Related { .. })
    }
}

/// A structural-map division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub id: Option<String>,
    pub label: String,
    pub pointers: Vec<Pointer>,
    pub divisions: Vec<Division>,
}

impl Division {
    /// Create an empty division with a fresh identifier.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Some(new_id()),
            label: label.into(),
            pointers: Vec::new(),
            divisions: Vec::new(),
        }
    }

    /// Append a pointer.
    pub fn push_pointer(&mut self, pointer: Pointer) {
        self.pointers.push(pointer);
    }

    /// Insert a pointer ahead of every other pointer.
    pub fn push_leading_pointer(&mut self, pointer: Pointer) {
        self.pointers.insert(0, pointer);
    }

    /// Find a direct sub-division by label.
    pub fn division(&self, label: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.label == label)
    }
}

/// `TYPE` of a structural map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructMapKind {
    Physical,
    Logical,
}

impl StructMapKind {
    /// Attribute value.
    pub fn tag(&self) -> &'static str {
        match self {
            StructMapKind::Physical => "PHYSICAL",
            StructMapKind::Logical => "logical",
        }
    }
}

/// A structural map with a single root division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMap {
    pub id: Option<String>,
    pub label: String,
    pub kind: StructMapKind,
    pub root: Division,
}

/// Note attached to an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentNote {
    pub text: String,
    /// `csip:NOTETYPE` attribute.
    pub note_type: Option<String>,
}

/// A header agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub role: String,
    pub agent_type: String,
    pub other_type: Option<String>,
    pub name: String,
    pub note: Option<AgentNote>,
}

impl Agent {
    /// Software agent that created the descriptor.
    pub fn software(name: impl Into<String>, version: &str) -> Self {
        Self {
            role: "CREATOR".to_string(),
            agent_type: "OTHER".to_string(),
            other_type: Some("SOFTWARE".to_string()),
            name: name.into(),
            note: Some(AgentNote {
                text: format!("VERSION={}", version),
                note_type: Some("SOFTWARE VERSION".to_string()),
            }),
        }
    }

    /// Organisation agent with a role.
    pub fn organization(role: &str, name: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            agent_type: "ORGANIZATION".to_string(),
            other_type: None,
            name: name.into(),
            note: None,
        }
    }
}

/// `metsHdr` contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub created: String,
    pub record_status: String,
    pub package_type: String,
    pub agents: Vec<Agent>,
    pub document_id: String,
}

/// Schema locations written into `xsi:schemaLocation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLocation {
    pub mets: String,
    pub xlink: String,
    pub csip: String,
}

/// The complete assembled descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub object_id: String,
    pub label: String,
    pub profile_url: String,
    pub content_category: String,
    pub content_information_type: String,
    /// `USE` attribute of every file entry.
    pub file_use: String,
    pub schema_location: SchemaLocation,
    pub header: Header,
    pub descriptive: Vec<MetadataRecord>,
    pub administrative_id: String,
    pub provenance: Vec<MetadataRecord>,
    pub file_section_id: String,
    pub file_groups: Vec<FileGroup>,
    pub struct_maps: Vec<StructMap>,
}

impl Descriptor {
    /// Every registered content file, in group order.
    pub fn file_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.file_groups.iter().flat_map(|group| group.entries.iter())
    }

    /// Every registered metadata file, descriptive first.
    pub fn metadata_entries(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.descriptive
            .iter()
            .chain(self.provenance.iter())
            .map(|record| &record.entry)
    }

    /// Structural map by label.
    pub fn struct_map(&self, label: &str) -> Option<&StructMap> {
        self.struct_maps.iter().find(|map| map.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_format_and_uniqueness() {
        let a = new_id();
        let b = new_id();
        assert!(a.starts_with("ID"));
        assert_eq!(a.len(), 2 + 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_provenance_type_detection() {
        assert_eq!(MetadataType::for_provenance_file("premis.xml"), MetadataType::Premis);
        assert_eq!(
            MetadataType::for_provenance_file("premis_events.xml"),
            MetadataType::Premis
        );
        assert_eq!(
            MetadataType::for_provenance_file("rep1-premis.xml"),
            MetadataType::Premis
        );
        assert_eq!(MetadataType::for_provenance_file("events.log"), MetadataType::Other);
        assert_eq!(MetadataType::Premis.tag(), "PREMIS");
    }

    #[test]
    fn test_leading_pointer_goes_first() {
        let mut division = Division::new("representations/rep1");
        division.push_pointer(Pointer::file("ID1"));
        division.push_leading_pointer(Pointer::Package {
            id: new_id(),
            href: "representations/rep1/METS.xml".to_string(),
            title: "rep1".to_string(),
        });

        assert!(division.pointers[0].is_package_reference());
        assert_eq!(division.pointers[1].file_id(), Some("ID1"));
    }

    #[test]
    fn test_software_agent() {
        let agent = Agent::software("earkmets", "1.2.3");
        assert_eq!(agent.other_type.as_deref(), Some("SOFTWARE"));
        assert_eq!(agent.note.unwrap().text, "VERSION=1.2.3");
    }

    #[test]
    fn test_group_len() {
        let group = FileGroup::new(FolderRole::Data);
        assert!(group.is_empty());
        assert_eq!(group.len(), 0);
        assert_eq!(group.role, FolderRole::Data);
    }
}
