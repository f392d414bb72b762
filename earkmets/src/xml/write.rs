//! Serializing an [`Element`] tree.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{Element, Node, XmlError};

/// Indentation width used for pretty printing.
const INDENT: usize = 2;

/// Serialize a tree as a UTF-8 document with an XML declaration.
pub fn to_xml_string(root: &Element) -> Result<String, XmlError> {
    write_parts(&[], root, &[])
}

/// Serialize a root element with the nodes around it.
pub(crate) fn write_parts(
    prolog: &[Node],
    root: &Element,
    epilog: &[Node],
) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    for node in prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, root)?;
    for node in epilog {
        write_node(&mut writer, node)?;
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| XmlError::Serialize(e.to_string()))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Serialize(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children().is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in element.children() {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name())))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(nested) => write_element(writer, nested),
        Node::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        // Raw content, written back as read
        Node::Comment(text) => write_event(
            writer,
            Event::Comment(BytesText::from_escaped(text.as_str())),
        ),
        Node::ProcessingInstruction(text) => {
            write_event(writer, Event::PI(BytesText::from_escaped(text.as_str())))
        }
        Node::DocType(text) => {
            write_event(writer, Event::DocType(BytesText::from_escaped(text.as_str())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{parse_document, Document};

    #[test]
    fn test_writes_declaration() {
        let text = to_xml_string(&Element::new("mets")).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<mets/>"));
    }

    #[test]
    fn test_escapes_attributes_and_text() {
        let root = Element::new("agent")
            .with_attr("NOTE", "a \"quoted\" <value>")
            .with_child(Element::new("name").with_text("R&D"));
        let text = to_xml_string(&root).unwrap();

        assert!(text.contains("R&amp;D"));
        assert!(!text.contains("<value>"));

        let parsed = parse_document(&text).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_comments_and_instructions_written_back() {
        let input = "<!-- before -->\n<mets><!-- inside --><name>  E-ARK  </name><?archive keep?></mets>";
        let document = Document::parse(input).unwrap();
        let text = document.to_xml_string().unwrap();

        assert!(text.contains("<!-- before -->"));
        assert!(text.contains("<!-- inside -->"));
        assert!(text.contains("<name>  E-ARK  </name>"));
        assert!(text.contains("<?archive keep?>"));
        assert_eq!(Document::parse(&text).unwrap(), document);
    }

    #[test]
    fn test_nested_tree_survives_reparse() {
        let root = Element::new("mets")
            .with_attr("xmlns", "http://www.loc.gov/METS/")
            .with_child(
                Element::new("structMap").with_attr("TYPE", "PHYSICAL").with_child(
                    Element::new("div")
                        .with_attr("LABEL", "data")
                        .with_child(Element::new("fptr").with_attr("FILEID", "ID1")),
                ),
            );

        let parsed = parse_document(&to_xml_string(&root).unwrap()).unwrap();
        assert_eq!(parsed, root);
    }
}
