//! Owned element tree and namespace prefix resolution.

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data (already unescaped).
    Text(String),
    /// Comment content between `<!--` and `-->`.
    Comment(String),
    /// Processing instruction content between `<?` and `?>`.
    ProcessingInstruction(String),
    /// Document type declaration content after `<!DOCTYPE `.
    DocType(String),
}

/// An XML element with its qualified name, attributes in document order and
/// children.
///
/// Names are stored exactly as written (`mets:div`, `xlink:href`). Lookups by
/// namespace go through [`Namespaces`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`].
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`Element::push`].
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Builder form of [`Element::push_text`].
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix of the name, if any.
    pub fn prefix(&self) -> Option<&str> {
        split_qname(&self.name).0
    }

    /// Name without its prefix.
    pub fn local_name(&self) -> &str {
        split_qname(&self.name).1
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// First value of the attribute with this exact qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the attribute with this exact qualified name.
    ///
    /// Well-formed documents hold at most one; parsed input keeps duplicates
    /// so that callers can detect ambiguity.
    pub fn attr_values(&self, name: &str) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Set an attribute, replacing the first existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append an attribute without checking for an existing one.
    pub(crate) fn push_attr(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    /// All child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Insert a child element at a node position (clamped to the end).
    pub fn insert(&mut self, index: usize, child: Element) {
        let index = index.min(self.children.len());
        self.children.insert(index, Node::Element(child));
    }

    /// Append character data.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Append any child node.
    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Child elements, skipping other nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Mutable child elements, skipping other nodes.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of child elements.
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Namespace bindings declared on a document's root element.
///
/// Descriptors declare all of their namespaces on the root, so resolution
/// does not track scoped re-declarations. Prefixes that are not declared
/// at all fall back to matching by local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    default: Option<String>,
    prefixed: Vec<(String, String)>,
}

impl Namespaces {
    /// Collect `xmlns` / `xmlns:*` declarations from an element.
    pub fn from_element(element: &Element) -> Self {
        let mut namespaces = Self::default();
        for (key, value) in element.attributes() {
            if key == "xmlns" {
                namespaces.default = Some(value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                namespaces.prefixed.push((prefix.to_string(), value.clone()));
            }
        }
        namespaces
    }

    /// Namespace URI bound to a prefix (`None` is the default namespace).
    pub fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        match prefix {
            None => self.default.as_deref(),
            Some(prefix) => self
                .prefixed
                .iter()
                .find(|(p, _)| p == prefix)
                .map(|(_, uri)| uri.as_str()),
        }
    }

    /// Prefix bound to a namespace URI.
    ///
    /// Returns `Some(None)` when the URI is the default namespace.
    pub fn prefix_for(&self, uri: &str) -> Option<Option<&str>> {
        if self.default.as_deref() == Some(uri) {
            return Some(None);
        }
        self.prefixed
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(prefix, _)| Some(prefix.as_str()))
    }

    /// Whether an element is `{namespace}local`.
    pub fn is_element(&self, element: &Element, namespace: &str, local: &str) -> bool {
        if element.local_name() != local {
            return false;
        }
        match self.resolve(element.prefix()) {
            Some(uri) => uri == namespace,
            None => true,
        }
    }

    /// Values of the attribute `{namespace}local` on an element.
    pub fn attr_values<'a>(&self, element: &'a Element, namespace: &str, local: &str) -> Vec<&'a str> {
        element
            .attributes()
            .iter()
            .filter(|(key, _)| match split_qname(key) {
                (Some(prefix), name) if name == local => match self.resolve(Some(prefix)) {
                    Some(uri) => uri == namespace,
                    None => true,
                },
                _ => false,
            })
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// First value of the attribute `{namespace}local` on an element.
    pub fn attr<'a>(&self, element: &'a Element, namespace: &str, local: &str) -> Option<&'a str> {
        self.attr_values(element, namespace, local).into_iter().next()
    }

    /// Qualified name for `local` in the namespace bound to `prefix`.
    pub fn qualify(prefix: Option<&str>, local: &str) -> String {
        match prefix {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METS: &str = "http://www.loc.gov/METS/";
    const XLINK: &str = "http://www.w3.org/1999/xlink";

    #[test]
    fn test_prefix_and_local_name() {
        let element = Element::new("mets:div");
        assert_eq!(element.prefix(), Some("mets"));
        assert_eq!(element.local_name(), "div");

        let plain = Element::new("div");
        assert_eq!(plain.prefix(), None);
        assert_eq!(plain.local_name(), "div");
    }

    #[test]
    fn test_set_attr_replaces_existing() {
        let mut element = Element::new("file").with_attr("ID", "a");
        element.set_attr("ID", "b");
        assert_eq!(element.attr("ID"), Some("b"));
        assert_eq!(element.attributes().len(), 1);
    }

    #[test]
    fn test_attr_values_keeps_duplicates() {
        let mut element = Element::new("mets");
        element.push_attr("OBJID".to_string(), "one".to_string());
        element.push_attr("OBJID".to_string(), "two".to_string());
        assert_eq!(element.attr_values("OBJID"), vec!["one", "two"]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut element = Element::new("div");
        element.push(Element::new("fptr"));
        element.insert(0, Element::new("mptr"));
        element.insert(99, Element::new("last"));

        let names: Vec<&str> = element.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["mptr", "fptr", "last"]);
    }

    #[test]
    fn test_text_skips_elements() {
        let element = Element::new("name")
            .with_text("E-")
            .with_child(Element::new("b"))
            .with_text("ARK");
        assert_eq!(element.text(), "E-ARK");
        assert_eq!(element.element_count(), 1);
    }

    #[test]
    fn test_namespaces_default_and_prefixed() {
        let root = Element::new("mets")
            .with_attr("xmlns", METS)
            .with_attr("xmlns:xlink", XLINK);
        let ns = Namespaces::from_element(&root);

        assert_eq!(ns.resolve(None), Some(METS));
        assert_eq!(ns.resolve(Some("xlink")), Some(XLINK));
        assert_eq!(ns.resolve(Some("other")), None);
        assert_eq!(ns.prefix_for(METS), Some(None));
        assert_eq!(ns.prefix_for(XLINK), Some(Some("xlink")));
        assert_eq!(ns.prefix_for("urn:unknown"), None);
    }

    #[test]
    fn test_is_element_checks_namespace() {
        let root = Element::new("m:mets")
            .with_attr("xmlns:m", METS)
            .with_attr("xmlns:x", "urn:other");
        let ns = Namespaces::from_element(&root);

        assert!(ns.is_element(&Element::new("m:file"), METS, "file"));
        assert!(!ns.is_element(&Element::new("x:file"), METS, "file"));
        assert!(!ns.is_element(&Element::new("m:div"), METS, "file"));
        // undeclared prefixes match by local name
        assert!(ns.is_element(&Element::new("file"), METS, "file"));
    }

    #[test]
    fn test_namespaced_attr_lookup() {
        let root = Element::new("mets").with_attr("xmlns:xl", XLINK);
        let ns = Namespaces::from_element(&root);
        let flocat = Element::new("FLocat")
            .with_attr("xl:href", "data/report.pdf")
            .with_attr("href", "ignored");

        assert_eq!(ns.attr(&flocat, XLINK, "href"), Some("data/report.pdf"));
        assert_eq!(ns.attr(&flocat, METS, "href"), None);
    }

    #[test]
    fn test_qualify() {
        assert_eq!(Namespaces::qualify(Some("mets"), "div"), "mets:div");
        assert_eq!(Namespaces::qualify(None, "div"), "div");
    }
}
