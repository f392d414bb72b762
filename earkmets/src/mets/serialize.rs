//! Conversion of an assembled [`Descriptor`] into an XML tree.
//!
//! Generated descriptors bind the METS namespace as the default namespace and
//! declare the remaining namespaces with the prefixes of
//! [`NAMESPACE_DECLARATIONS`].

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::{MetsError, MetsResult};
use super::model::{
    Agent, Descriptor, Division, FileEntry, FileGroup, Header, MetadataRecord, Pointer, StructMap,
};
use crate::profile::{CHECKSUM_TYPE, CSIP_NS, METS_NS, NAMESPACE_DECLARATIONS, XLINK_NS};
use crate::xml::{to_xml_string, Element, Namespaces};

/// Element and attribute names for a document's namespace prefixes.
///
/// Generated documents use the default namespace for METS and `xlink` for
/// XLink; documents edited in place may bind other prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedNames {
    mets: Option<String>,
    xlink: String,
}

impl QualifiedNames {
    /// Names for a given METS prefix and XLink prefix.
    pub fn new(mets: Option<&str>, xlink: &str) -> Self {
        Self {
            mets: mets.map(str::to_string),
            xlink: xlink.to_string(),
        }
    }

    /// METS element name.
    pub fn mets(&self, local: &str) -> String {
        Namespaces::qualify(self.mets.as_deref(), local)
    }

    /// XLink attribute name.
    pub fn xlink(&self, local: &str) -> String {
        Namespaces::qualify(Some(&self.xlink), local)
    }
}

impl Default for QualifiedNames {
    fn default() -> Self {
        Self::new(None, "xlink")
    }
}

/// Build the complete document tree.
pub fn descriptor_to_element(descriptor: &Descriptor) -> Element {
    let names = QualifiedNames::default();
    let mut root = Element::new(names.mets("mets"));

    for (prefix, uri) in NAMESPACE_DECLARATIONS {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        root.set_attr(key, *uri);
    }

    let location = &descriptor.schema_location;
    root.set_attr("OBJID", &descriptor.object_id);
    root.set_attr("LABEL", &descriptor.label);
    root.set_attr("PROFILE", &descriptor.profile_url);
    root.set_attr("TYPE", &descriptor.content_category);
    root.set_attr(
        "csip:CONTENTINFORMATIONTYPE",
        &descriptor.content_information_type,
    );
    root.set_attr(
        "xsi:schemaLocation",
        format!(
            "{} {} {} {} {} {}",
            METS_NS, location.mets, XLINK_NS, location.xlink, CSIP_NS, location.csip
        ),
    );

    root.push(header_element(&names, &descriptor.header));

    for record in &descriptor.descriptive {
        let section = Element::new(names.mets("dmdSec"))
            .with_attr("ID", &record.section_id)
            .with_attr("CREATED", &record.created)
            .with_attr("STATUS", "CURRENT")
            .with_child(md_ref_element(&names, record));
        root.push(section);
    }

    if !descriptor.provenance.is_empty() {
        let mut amd =
            Element::new(names.mets("amdSec")).with_attr("ID", &descriptor.administrative_id);
        for record in &descriptor.provenance {
            amd.push(
                Element::new(names.mets("digiprovMD"))
                    .with_attr("ID", &record.section_id)
                    .with_attr("STATUS", "CURRENT")
                    .with_child(md_ref_element(&names, record)),
            );
        }
        root.push(amd);
    }

    let mut file_section =
        Element::new(names.mets("fileSec")).with_attr("ID", &descriptor.file_section_id);
    for group in descriptor.file_groups.iter().filter(|g| !g.is_empty()) {
        file_section.push(file_group_element(&names, group, &descriptor.file_use));
    }
    root.push(file_section);

    for map in &descriptor.struct_maps {
        root.push(struct_map_element(&names, map));
    }

    root
}

/// Serialize and write a descriptor.
///
/// # Errors
///
/// Returns [`MetsError::Xml`] if serialization fails and
/// [`MetsError::WriteFailed`] if the file cannot be written.
pub fn write_descriptor(descriptor: &Descriptor, path: &Path) -> MetsResult<()> {
    let root = descriptor_to_element(descriptor);
    let content = to_xml_string(&root).map_err(|e| MetsError::Xml {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, content).map_err(|e| MetsError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), "Wrote descriptor");
    Ok(())
}

fn header_element(names: &QualifiedNames, header: &Header) -> Element {
    let mut element = Element::new(names.mets("metsHdr"))
        .with_attr("CREATEDATE", &header.created)
        .with_attr("RECORDSTATUS", &header.record_status)
        .with_attr("csip:OAISPACKAGETYPE", &header.package_type);

    for agent in &header.agents {
        element.push(agent_element(names, agent));
    }
    element.push(Element::new(names.mets("metsDocumentID")).with_text(&header.document_id));
    element
}

fn agent_element(names: &QualifiedNames, agent: &Agent) -> Element {
    let mut element = Element::new(names.mets("agent"))
        .with_attr("ROLE", &agent.role)
        .with_attr("TYPE", &agent.agent_type);
    if let Some(other_type) = &agent.other_type {
        element.set_attr("OTHERTYPE", other_type);
    }

    element.push(Element::new(names.mets("name")).with_text(&agent.name));
    if let Some(note) = &agent.note {
        let mut note_element = Element::new(names.mets("note")).with_text(&note.text);
        if let Some(note_type) = &note.note_type {
            note_element.set_attr("csip:NOTETYPE", note_type);
        }
        element.push(note_element);
    }
    element
}

fn md_ref_element(names: &QualifiedNames, record: &MetadataRecord) -> Element {
    let entry = &record.entry;
    Element::new(names.mets("mdRef"))
        .with_attr("LOCTYPE", "URL")
        .with_attr("MIMETYPE", &entry.facts.mime_type)
        .with_attr("CREATED", &entry.facts.created)
        .with_attr(names.xlink("type"), "simple")
        .with_attr(names.xlink("href"), &entry.facts.href)
        .with_attr("CHECKSUMTYPE", CHECKSUM_TYPE)
        .with_attr("CHECKSUM", &entry.facts.checksum)
        .with_attr("ID", &entry.id)
        .with_attr("SIZE", entry.facts.size.to_string())
        .with_attr("MDTYPE", entry.md_type.tag())
}

fn file_group_element(names: &QualifiedNames, group: &FileGroup, file_use: &str) -> Element {
    let mut element = Element::new(names.mets("fileGrp"))
        .with_attr("ID", &group.id)
        .with_attr("USE", group.role.token());
    for entry in &group.entries {
        element.push(file_element(names, entry, file_use));
    }
    element
}

fn file_element(names: &QualifiedNames, entry: &FileEntry, file_use: &str) -> Element {
    let location = Element::new(names.mets("FLocat"))
        .with_attr(names.xlink("href"), &entry.facts.href)
        .with_attr("LOCTYPE", "URL")
        .with_attr(names.xlink("type"), "simple");

    Element::new(names.mets("file"))
        .with_attr("MIMETYPE", &entry.facts.mime_type)
        .with_attr("CHECKSUMTYPE", CHECKSUM_TYPE)
        .with_attr("CREATED", &entry.facts.created)
        .with_attr("CHECKSUM", &entry.facts.checksum)
        .with_attr("USE", file_use)
        .with_attr("ID", &entry.id)
        .with_attr("SIZE", entry.facts.size.to_string())
        .with_child(location)
}

fn struct_map_element(names: &QualifiedNames, map: &StructMap) -> Element {
    let mut element = Element::new(names.mets("structMap"));
    if let Some(id) = &map.id {
        element.set_attr("ID", id);
    }
    element
        .with_attr("TYPE", map.kind.tag())
        .with_attr("LABEL", &map.label)
        .with_child(division_element(names, &map.root))
}

/// Build a `div` with its pointers followed by its sub-divisions.
pub(crate) fn division_element(names: &QualifiedNames, division: &Division) -> Element {
    let mut element = Element::new(names.mets("div"));
    if let Some(id) = &division.id {
        element.set_attr("ID", id);
    }
    element.set_attr("LABEL", &division.label);

    for pointer in &division.pointers {
        element.push(pointer_element(names, pointer));
    }
    for nested in &division.divisions {
        element.push(division_element(names, nested));
    }
    element
}

fn pointer_element(names: &QualifiedNames, pointer: &Pointer) -> Element {
    match pointer {
        Pointer::File { file_id } => Element::new(names.mets("fptr")).with_attr("FILEID", file_id),
        Pointer::Package { id, href, title } => Element::new(names.mets("mptr"))
            .with_attr("LOCTYPE", "URL")
            .with_attr(names.xlink("title"), title)
            .with_attr(names.xlink("href"), href)
            .with_attr(names.xlink("type"), "simple")
            .with_attr("ID", id),
        Pointer::Related { id, href, title } => Element::new(names.mets("mptr"))
            .with_attr("LOCTYPE", "OTHER")
            .with_attr("OTHERLOCTYPE", "UUID")
            .with_attr(names.xlink("title"), title)
            .with_attr(names.xlink("href"), href)
            .with_attr("ID", id),
    }
}
