//! METS descriptor generation, relationship linking and reading.
//!
//! # Overview
//!
//! Generation happens in one pass over the package tree:
//! 1. File groups are created for the package root role and every
//!    recognised immediate subdirectory
//! 2. The walk registers files into groups and adds pointers to the
//!    structural maps ([`StructMapBuilder`])
//! 3. `<root>/metadata` is handed to the [`MetadataClassifier`]
//! 4. The assembled [`Descriptor`] is serialized and written once
//!
//! The [`RelationshipLinker`] edits an existing descriptor in place, and the
//! [`DescriptorReader`] recovers identifiers, checksums and references from
//! one.

mod error;
mod generator;
mod metadata;
mod model;
mod reader;
mod registrar;
mod relation;
mod serialize;
mod structmap;

pub use error::{MetsError, MetsResult};
pub use generator::{
    directory_kind, file_action, Assembly, DirectoryKind, FileAction, GenerationReport,
    MetsGenerator, SkipReason, SkippedFile,
};
pub use metadata::{
    ClassifiedMetadata, MetadataClassifier, MetadataPlan, MetadataScope, METADATA_FOLDER,
    MIGRATION_PATTERN, REPRESENTATIONS_FOLDER,
};
pub use model::{
    new_id, Agent, AgentNote, Descriptor, Division, FileEntry, FileGroup, Header, MetadataEntry,
    MetadataRecord, MetadataSection, MetadataType, Pointer, SchemaLocation, StructMap,
    StructMapKind,
};
pub use reader::{
    DescriptorReader, DescriptorSummary, FileEntryRef, FileEntrySummary, NO_OBJECT_ID,
    NO_PACKAGE_TYPE,
};
pub use registrar::FileRegistrar;
pub use relation::{
    link_into, parent_struct_map, Direction, LinkOutcome, RelationshipLinker,
    PARENT_MAP_LABEL,
};
pub use serialize::{descriptor_to_element, write_descriptor, QualifiedNames};
pub use structmap::{
    DirectoryHandle, LogicalRole, StructMapBuilder, CONTENT_DIVISION_LABEL,
    METADATA_DIVISION_LABEL, PACKAGE_STRUCTURE_LABEL, PHYSICAL_MAP_LABEL, SCHEMA_DIVISION_LABEL,
};
