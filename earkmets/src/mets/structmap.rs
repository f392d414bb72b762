//! Incremental construction of the physical and logical structural maps.
//!
//! The physical map has one division per visited directory, flat below the
//! package division and in walk order. The logical map sorts every pointer
//! into one of three role divisions.

use super::model::{new_id, Division, Pointer, StructMap, StructMapKind};

/// `LABEL` of the physical structural map.
pub const PHYSICAL_MAP_LABEL: &str = "CSIP";

/// Root division of the logical structural map.
pub const PACKAGE_STRUCTURE_LABEL: &str = "Package structure";

/// Logical division holding metadata pointers.
pub const METADATA_DIVISION_LABEL: &str = "metadata files";

/// Logical division holding schema pointers.
pub const SCHEMA_DIVISION_LABEL: &str = "schema files";

/// Logical division holding content pointers.
pub const CONTENT_DIVISION_LABEL: &str = "content files";

/// Logical role of a registered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalRole {
    Metadata,
    Schema,
    Content,
}

/// Handle to a physical directory division opened by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryHandle(usize);

/// Builds both structural maps while the package is walked.
#[derive(Debug)]
pub struct StructMapBuilder {
    package: Division,
    metadata: Division,
    schema: Division,
    content: Division,
}

impl StructMapBuilder {
    /// Start the maps of a package.
    pub fn new(package_id: &str) -> Self {
        Self {
            package: Division::new(package_id),
            metadata: Division::new(METADATA_DIVISION_LABEL),
            schema: Division::new(SCHEMA_DIVISION_LABEL),
            content: Division::new(CONTENT_DIVISION_LABEL),
        }
    }

    /// Open the physical division of a directory, labelled with its path
    /// relative to the package root.
    pub fn open_directory(&mut self, label: impl Into<String>) -> DirectoryHandle {
        self.package.divisions.push(Division::new(label));
        DirectoryHandle(self.package.divisions.len() - 1)
    }

    /// Physical division of an opened directory.
    pub fn directory(&self, handle: DirectoryHandle) -> &Division {
        &self.package.divisions[handle.0]
    }

    /// Point at a registered entry from its directory and, when it has one,
    /// from its logical role division.
    pub fn add_entry(&mut self, handle: DirectoryHandle, role: Option<LogicalRole>, id: &str) {
        self.package.divisions[handle.0].push_pointer(Pointer::file(id));
        if let Some(role) = role {
            self.role_division(role).push_pointer(Pointer::file(id));
        }
    }

    /// Point at a nested package descriptor. The pointer goes ahead of every
    /// other pointer of the directory.
    pub fn add_nested_package(&mut self, handle: DirectoryHandle, pointer: Pointer) {
        self.package.divisions[handle.0].push_leading_pointer(pointer);
    }

    fn role_division(&mut self, role: LogicalRole) -> &mut Division {
        match role {
            LogicalRole::Metadata => &mut self.metadata,
            LogicalRole::Schema => &mut self.schema,
            LogicalRole::Content => &mut self.content,
        }
    }

    /// Finish both maps: physical first, then logical.
    pub fn finish(self, package_type: &str) -> (StructMap, StructMap) {
        let physical = StructMap {
            id: Some(new_id()),
            label: PHYSICAL_MAP_LABEL.to_string(),
            kind: StructMapKind::Physical,
            root: self.package,
        };

        let mut structure = Division::new(PACKAGE_STRUCTURE_LABEL);
        structure.divisions = vec![self.metadata, self.schema, self.content];

        let logical = StructMap {
            id: Some(new_id()),
            label: format!("Simple {} structuring", package_type),
            kind: StructMapKind::Logical,
            root: structure,
        };

        (physical, logical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_are_flat_in_open_order() {
        let mut builder = StructMapBuilder::new("urn:uuid:1");
        builder.open_directory("data");
        builder.open_directory("representations/rep1");
        builder.open_directory("representations/rep1/data");

        let (physical, _) = builder.finish("AIP");
        let labels: Vec<&str> = physical
            .root
            .divisions
            .iter()
            .map(|d| d.label.as_str())
            .collect();

        assert_eq!(physical.label, "CSIP");
        assert_eq!(physical.kind, StructMapKind::Physical);
        assert_eq!(physical.root.label, "urn:uuid:1");
        assert_eq!(
            labels,
            vec!["data", "representations/rep1", "representations/rep1/data"]
        );
    }

    #[test]
    fn test_entries_reach_both_maps() {
        let mut builder = StructMapBuilder::new("urn:uuid:1");
        let schemas = builder.open_directory("schemas");
        let data = builder.open_directory("data");
        builder.add_entry(schemas, Some(LogicalRole::Schema), "IDs");
        builder.add_entry(data, Some(LogicalRole::Content), "IDc");
        builder.add_entry(data, None, "IDphysical");

        assert_eq!(builder.directory(data).pointers.len(), 2);

        let (_, logical) = builder.finish("SIP");
        assert_eq!(logical.label, "Simple SIP structuring");
        assert_eq!(logical.root.label, "Package structure");

        let schema = logical.root.division("schema files").unwrap();
        let content = logical.root.division("content files").unwrap();
        let metadata = logical.root.division("metadata files").unwrap();
        assert_eq!(schema.pointers, vec![Pointer::file("IDs")]);
        assert_eq!(content.pointers, vec![Pointer::file("IDc")]);
        assert!(metadata.pointers.is_empty());
    }

    #[test]
    fn test_nested_package_pointer_is_first() {
        let mut builder = StructMapBuilder::new("urn:uuid:1");
        let rep = builder.open_directory("representations/rep1");
        builder.add_entry(rep, Some(LogicalRole::Content), "IDa");
        builder.add_nested_package(
            rep,
            Pointer::Package {
                id: "IDm".to_string(),
                href: "representations/rep1/METS.xml".to_string(),
                title: "rep1".to_string(),
            },
        );

        let pointers = &builder.directory(rep).pointers;
        assert!(pointers[0].is_package_reference());
        assert_eq!(pointers[1].file_id(), Some("IDa"));
    }
}
