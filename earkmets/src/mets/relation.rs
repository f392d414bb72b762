//! Parent/child relationships between packages.
//!
//! Relationships are logical structural maps holding `mptr` elements that
//! reference another package by identifier. The generator adds the parent
//! map of a new package; [`RelationshipLinker`] appends relationships to an
//! already written sibling descriptor.
//!
//! The linker reads, edits and rewrites the sibling descriptor without any
//! locking. Two processes linking into the same descriptor at the same time
//! may lose one of the updates.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{MetsError, MetsResult};
use super::model::{new_id, Division, Pointer, StructMap, StructMapKind};
use super::serialize::{division_element, QualifiedNames};
use crate::profile::{DESCRIPTOR_FILENAME, METS_NS, XLINK_NS};
use crate::xml::{Document, Element, Namespaces};

/// `LABEL` of the parent map written at generation time.
pub const PARENT_MAP_LABEL: &str = "parent";

/// Direction of a relationship, seen from the descriptor being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Parent,
    Child,
}

impl Direction {
    /// Label token.
    pub fn token(&self) -> &'static str {
        match self {
            Direction::Parent => "parent",
            Direction::Child => "child",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of a link operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A pointer was appended and the descriptor rewritten.
    Linked { pointer_id: String },
    /// The sibling descriptor does not exist; nothing was changed.
    SiblingMissing,
}

/// Parent map of a newly generated package.
pub fn parent_struct_map(package_id: &str, package_type: &str, parent_id: &str) -> StructMap {
    let mut division = Division::new(format!("{} parent identifier", package_type));
    division.push_pointer(Pointer::Related {
        id: new_id(),
        href: parent_id.to_string(),
        title: format!(
            "Referencing the parent {} of this ({}) {}.",
            package_type, package_id, package_type
        ),
    });

    StructMap {
        id: None,
        label: PARENT_MAP_LABEL.to_string(),
        kind: StructMapKind::Logical,
        root: division,
    }
}

/// Append a relationship pointer to a parsed descriptor.
///
/// The pointer goes into `structMap[@LABEL='<dir> <type>']` /
/// `div[@LABEL='<dir> <type> identifiers']`, both created when absent.
/// Returns the identifier of the new pointer.
pub fn link_into(
    root: &mut Element,
    direction: Direction,
    package_type: &str,
    identifier: &str,
) -> String {
    let namespaces = Namespaces::from_element(root);
    let mets_prefix = match namespaces.prefix_for(METS_NS) {
        Some(prefix) => prefix.map(str::to_string),
        None => root.prefix().map(str::to_string),
    };
    let xlink_prefix = match namespaces.prefix_for(XLINK_NS) {
        Some(Some(prefix)) => prefix.to_string(),
        _ => {
            root.set_attr("xmlns:xlink", XLINK_NS);
            "xlink".to_string()
        }
    };
    let names = QualifiedNames::new(mets_prefix.as_deref(), &xlink_prefix);

    let label = format!("{} {}", direction, package_type);
    let identifiers_label = format!("{} identifiers", label);
    let pointer_id = new_id();

    let group = Division {
        id: None,
        label: label.clone(),
        pointers: vec![Pointer::Related {
            id: pointer_id.clone(),
            href: identifier.to_string(),
            title: format!("Referencing a {} {}.", direction, package_type),
        }],
        divisions: Vec::new(),
    };
    let group = division_element(&names, &group);

    let existing = root.elements_mut().find(|e| {
        namespaces.is_element(e, METS_NS, "structMap") && e.attr("LABEL") == Some(label.as_str())
    });

    match existing {
        Some(map) => {
            let identifiers = map.elements_mut().find(|e| {
                namespaces.is_element(e, METS_NS, "div")
                    && e.attr("LABEL") == Some(identifiers_label.as_str())
            });
            match identifiers {
                Some(identifiers) => identifiers.push(group),
                None => map.push(
                    Element::new(names.mets("div"))
                        .with_attr("LABEL", &identifiers_label)
                        .with_child(group),
                ),
            }
        }
        None => root.push(
            Element::new(names.mets("structMap"))
                .with_attr("TYPE", StructMapKind::Logical.tag())
                .with_attr("LABEL", &label)
                .with_child(
                    Element::new(names.mets("div"))
                        .with_attr("LABEL", &identifiers_label)
                        .with_child(group),
                ),
        ),
    }

    pointer_id
}

/// Records relationships in the descriptor of a sibling package.
#[derive(Debug, Clone)]
pub struct RelationshipLinker {
    descriptor: PathBuf,
    package_type: String,
}

impl RelationshipLinker {
    /// Linker for `<root>/METS.xml`.
    pub fn new(root: impl AsRef<Path>, package_type: impl Into<String>) -> Self {
        Self::for_descriptor(root.as_ref().join(DESCRIPTOR_FILENAME), package_type)
    }

    /// Linker for an explicit descriptor file.
    pub fn for_descriptor(descriptor: impl Into<PathBuf>, package_type: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            package_type: package_type.into(),
        }
    }

    /// Descriptor being edited.
    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    /// Record `identifier` as a parent package.
    ///
    /// # Errors
    ///
    /// See [`link`](Self::link).
    pub fn link_as_parent(&self, identifier: &str) -> MetsResult<LinkOutcome> {
        self.link(Direction::Parent, identifier)
    }

    /// Record `identifier` as a child package.
    ///
    /// # Errors
    ///
    /// See [`link`](Self::link).
    pub fn link_as_child(&self, identifier: &str) -> MetsResult<LinkOutcome> {
        self.link(Direction::Child, identifier)
    }

    /// Append a relationship pointer and rewrite the descriptor in place.
    ///
    /// Repeated calls with the same identifier add one pointer each.
    ///
    /// # Errors
    ///
    /// Returns [`MetsError::ReadFailed`], [`MetsError::Xml`] or
    /// [`MetsError::WriteFailed`] when the existing descriptor cannot be
    /// read, parsed or rewritten.
    pub fn link(&self, direction: Direction, identifier: &str) -> MetsResult<LinkOutcome> {
        let path = &self.descriptor;
        if !path.exists() {
            debug!(
                descriptor = %path.display(),
                %direction,
                "Sibling descriptor not found, nothing to link"
            );
            return Ok(LinkOutcome::SiblingMissing);
        }

        let content = fs::read_to_string(path).map_err(|e| MetsError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;
        let mut document = Document::parse(&content).map_err(|e| MetsError::Xml {
            path: path.clone(),
            source: e,
        })?;

        let pointer_id = link_into(
            &mut document.root,
            direction,
            &self.package_type,
            identifier,
        );

        let output = document.to_xml_string().map_err(|e| MetsError::Xml {
            path: path.clone(),
            source: e,
        })?;
        fs::write(path, output).map_err(|e| MetsError::WriteFailed {
            path: path.clone(),
            source: e,
        })?;

        info!(
            descriptor = %path.display(),
            %direction,
            target = identifier,
            "Linked package"
        );
        Ok(LinkOutcome::Linked { pointer_id })
    }
}
