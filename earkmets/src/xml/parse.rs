//! Parsing documents into an [`Element`] tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, Element, Node, XmlError};

/// Parse a complete document and return its root element.
///
/// Whitespace-only text is dropped, other text is kept as written. The
/// declaration is skipped. Duplicate attributes are kept in order.
pub fn parse_document(input: &str) -> Result<Element, XmlError> {
    parse(input).map(|document| document.root)
}

/// Parse a complete document, keeping comments, processing instructions and
/// the doctype.
pub(crate) fn parse(input: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut tree = TreeBuilder::default();

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                tree.open.push(start_element(&start, position)?);
            }
            Event::Empty(start) => {
                let element = start_element(&start, position)?;
                tree.attach(element, position)?;
            }
            Event::End(end) => {
                let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let element = match tree.open.pop() {
                    Some(element) if element.name() == found => element,
                    _ => return Err(XmlError::UnbalancedEnd { found, position }),
                };
                tree.attach(element, position)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| XmlError::Syntax {
                    position,
                    message: e.to_string(),
                })?;
                if text.trim().is_empty() {
                    continue;
                }
                if let Some(parent) = tree.open.last_mut() {
                    parent.push_text(text.into_owned());
                }
            }
            Event::CData(data) => {
                if let Some(parent) = tree.open.last_mut() {
                    parent.push_text(String::from_utf8_lossy(&data.into_inner()).into_owned());
                }
            }
            Event::Comment(comment) => {
                tree.push_node(Node::Comment(lossy(comment.into_inner().as_ref())));
            }
            Event::PI(instruction) => {
                tree.push_node(Node::ProcessingInstruction(lossy(
                    instruction.into_inner().as_ref(),
                )));
            }
            Event::DocType(doctype) => {
                tree.push_node(Node::DocType(lossy(doctype.into_inner().as_ref())));
            }
            Event::Eof => break,
            // XML declaration
            _ => {}
        }
    }

    tree.finish()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Open elements plus everything found outside the root.
#[derive(Default)]
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
    prolog: Vec<Node>,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    /// Attach a finished element to its parent, or make it the root.
    fn attach(&mut self, element: Element, position: usize) -> Result<(), XmlError> {
        match self.open.last_mut() {
            Some(parent) => {
                parent.push(element);
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some(element);
                Ok(())
            }
            None => Err(XmlError::Syntax {
                position,
                message: format!("second root element <{}>", element.name()),
            }),
        }
    }

    /// Attach a non-element node where it was found.
    fn push_node(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.push_node(node),
            None if self.root.is_none() => self.prolog.push(node),
            None => self.epilog.push(node),
        }
    }

    fn finish(self) -> Result<Document, XmlError> {
        if let Some(open) = self.open.last() {
            return Err(XmlError::UnexpectedEof(open.name().to_string()));
        }
        let root = self.root.ok_or(XmlError::NoRoot)?;
        Ok(Document {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn start_element(start: &BytesStart<'_>, position: usize) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    let mut attributes = start.attributes();
    attributes.with_checks(false);
    for attribute in attributes {
        let attribute = attribute.map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::Syntax {
                position,
                message: e.to_string(),
            })?
            .into_owned();
        element.push_attr(key, value);
    }

    Ok(element)
}
