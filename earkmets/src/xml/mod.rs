//! Minimal owned XML tree used for descriptor documents.
//!
//! Descriptors are small enough to hold in memory, and both the generator and
//! the relationship linker need to build or rewrite a whole document before
//! writing it once. This module provides:
//!
//! - [`Element`] / [`Node`]: an owned element tree that keeps qualified names
//!   (`prefix:local`) exactly as written
//! - [`Namespaces`]: prefix resolution based on the root element's `xmlns`
//!   declarations
//! - [`parse_document`]: parsing via `quick-xml`
//! - [`Document`]: the root element together with the comments, processing
//!   instructions and doctype around it, for documents rewritten in place
//! - [`to_xml_string`]: pretty-printed serialization with an XML declaration
//!
//! File I/O stays with the callers so that they can attach their own error
//! context.
//!
//! # Example
//!
//! ```
//! use earkmets::xml::{parse_document, to_xml_string, Element};
//!
//! let mut root = Element::new("mets").with_attr("OBJID", "urn:uuid:1");
//! root.push(Element::new("metsHdr").with_attr("RECORDSTATUS", "NEW"));
//!
//! let text = to_xml_string(&root).unwrap();
//! let parsed = parse_document(&text).unwrap();
//! assert_eq!(parsed.attr("OBJID"), Some("urn:uuid:1"));
//! ```

mod document;
mod element;
mod error;
mod parse;
mod write;

pub use document::Document;
pub use element::{Element, Namespaces, Node};
pub use error::XmlError;
pub use parse::parse_document;
pub use write::to_xml_string;
