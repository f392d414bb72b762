//! Namespaces, schema filenames and fixed descriptor values.
//!
//! Everything the generator writes verbatim lives here, either as a namespace
//! constant or as a field of [`Profile`], so that an alternate profile can be
//! substituted without touching the walk or the serializer.

/// METS namespace (default namespace of generated descriptors).
pub const METS_NS: &str = "http://www.loc.gov/METS/";

/// E-ARK CSIP extension namespace.
pub const CSIP_NS: &str = "https://DILCIS.eu/XML/METS/CSIPExtensionMETS";

/// Legacy METS extension namespace.
pub const METSEXT_NS: &str = "ExtensionMETS";

/// XLink namespace.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Prefix → namespace declarations written on the root element.
///
/// `None` marks the default namespace.
pub const NAMESPACE_DECLARATIONS: &[(Option<&str>, &str)] = &[
    (None, METS_NS),
    (Some("csip"), CSIP_NS),
    (Some("xlink"), XLINK_NS),
    (Some("ext"), METSEXT_NS),
    (Some("xsi"), XSI_NS),
];

/// Default descriptor filename, inside a package root.
pub const DESCRIPTOR_FILENAME: &str = "METS.xml";

/// Checksum algorithm tag written on every file and metadata reference.
pub const CHECKSUM_TYPE: &str = "SHA-256";

/// Media type used when none can be guessed from the filename.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Identifier prefix for every generated `ID` attribute.
pub const ID_PREFIX: &str = "ID";

/// Fixed values of a descriptor profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// `PROFILE` attribute of the root element.
    pub profile_url: String,

    /// `TYPE` attribute of the root element (content category).
    pub content_category: String,

    /// `csip:CONTENTINFORMATIONTYPE` attribute of the root element.
    pub content_information_type: String,

    /// Name of the archivist, creator and preservation organisation agents.
    pub organization: String,

    /// Name of the software agent.
    pub software_name: String,

    /// Version reported in the software agent note.
    pub software_version: String,

    /// `USE` attribute written on each file entry.
    pub file_use: String,

    /// METS schema filename looked up in the schema folder.
    pub mets_schema_file: String,

    /// XLink schema filename looked up in the schema folder.
    pub xlink_schema_file: String,

    /// METS schema location when the schema folder has no METS schema.
    pub default_mets_schema_location: String,

    /// XLink schema location when the schema folder has no XLink schema.
    pub default_xlink_schema_location: String,

    /// CSIP extension schema location.
    pub csip_schema_location: String,
}

impl Profile {
    /// The E-ARK Common Specification for Information Packages profile.
    pub fn csip() -> Self {
        Self {
            profile_url: "https://earkcsip.dilcis.eu/profile/E-ARK-CSIP.xml".to_string(),
            content_category: "Databases".to_string(),
            content_information_type: "SIARD2".to_string(),
            organization: "E-ARK".to_string(),
            software_name: env!("CARGO_PKG_NAME").to_string(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            file_use: "Datafile".to_string(),
            mets_schema_file: "mets.xsd".to_string(),
            xlink_schema_file: "xlink.xsd".to_string(),
            default_mets_schema_location: "schemas/mets.xsd".to_string(),
            default_xlink_schema_location: "https://www.w3.org/1999/xlink.xsd".to_string(),
            csip_schema_location: "schemas/DILCISExtensionMETS.xsd".to_string(),
        }
    }

    /// Override the content category and content information type.
    pub fn with_content_type(
        mut self,
        category: impl Into<String>,
        information_type: impl Into<String>,
    ) -> Self {
        self.content_category = category.into();
        self.content_information_type = information_type.into();
        self
    }

    /// Override the organisation agent name.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::csip()
    }
}
