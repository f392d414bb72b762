//! A document: the root element and the nodes around it.

use super::{parse, write, Element, Node, XmlError};

/// A parsed document.
///
/// Comments, processing instructions and the document type declaration that
/// appear before or after the root element are kept so that a document read
/// from disk can be written back without losing them. The XML declaration is
/// always regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Nodes before the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Nodes after the root element.
    pub epilog: Vec<Node>,
}

impl Document {
    /// Document with only a root element.
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the input is not well-formed.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        parse::parse(input)
    }

    /// Serialize with an XML declaration.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Serialize`] if writing fails.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        write::write_parts(&self.prolog, &self.root, &self.epilog)
    }
}
