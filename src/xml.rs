//! Minimal namespace-aware element tree
//!
//! Both input documents are small, so each is materialized completely into
//! an [`Element`] tree before extraction begins. Element names are resolved
//! against their namespace URI so lookups match on `{namespace}local` pairs
//! regardless of which prefix a document chose.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::{EvidenceError, Result};

/// A parsed XML element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Namespace URI the element name resolved to, if any
    pub namespace: Option<String>,

    /// Local element name (prefix stripped)
    pub name: String,

    /// Attributes in document order, keyed by their qualified name
    pub attributes: Vec<(String, String)>,

    /// Character data appearing before the first child element, trimmed
    pub text: String,

    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Check whether this element has the given namespace and local name
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Look up an attribute value by name
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children matching a namespace and local name, in document order
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(namespace, name))
    }
}

/// Read a document from disk and parse it into an element tree.
pub fn parse_file(path: &Path) -> Result<Element> {
    let content = std::fs::read_to_string(path).map_err(|e| EvidenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&content, path)
}

/// Parse XML text into its root element.
///
/// `source` only labels errors; it is usually the file path.
pub fn parse_document(content: &str, source: &Path) -> Result<Element> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = NsReader::from_str(content);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| EvidenceError::xml(source, format!("{} near byte {}", e, position)))?;
        let namespace = resolve_namespace(resolved, source)?;

        match event {
            Event::Start(ref e) => {
                let element = open_element(e, namespace, source)?;
                if stack.is_empty() && root.is_some() {
                    return Err(EvidenceError::xml(source, "multiple root elements"));
                }
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = open_element(e, namespace, source)?;
                attach(&mut stack, &mut root, element, source)?;
            }
            Event::End(_) => {
                // Mismatched end tags are rejected by the reader itself
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element, source)?;
                }
            }
            Event::Text(ref t) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        let text = t
                            .unescape()
                            .map_err(|e| EvidenceError::xml(source, e.to_string()))?;
                        current.text.push_str(text.trim());
                    }
                }
            }
            Event::CData(ref c) => {
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        current.text.push_str(String::from_utf8_lossy(c).trim());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(EvidenceError::xml(
            source,
            format!("unexpected end of document inside <{}>", open.name),
        ));
    }

    root.ok_or_else(|| EvidenceError::xml(source, "document has no root element"))
}

fn resolve_namespace(resolved: ResolveResult, source: &Path) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(EvidenceError::xml(
            source,
            format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ),
        )),
    }
}

fn open_element(e: &BytesStart, namespace: Option<String>, source: &Path) -> Result<Element> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| EvidenceError::xml(source, err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| EvidenceError::xml(source, err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    source: &Path,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(EvidenceError::xml(source, "multiple root elements")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Element> {
        parse_document(xml, Path::new("test.xml"))
    }

    #[test]
    fn test_resolves_default_and_prefixed_namespaces() {
        let root = parse(
            r#"<a xmlns="urn:one" xmlns:t="urn:two"><b/><t:c id="x">hi</t:c></a>"#,
        )
        .unwrap();
        assert!(root.is("urn:one", "a"));
        assert!(root.children[0].is("urn:one", "b"));
        assert!(root.children[1].is("urn:two", "c"));
        assert_eq!(root.children[1].attr("id"), Some("x"));
        assert_eq!(root.children[1].text, "hi");
    }

    #[test]
    fn test_children_named_filters_direct_children_only() {
        let root = parse(
            r#"<r xmlns="urn:x"><item/><other><item/></other><item/></r>"#,
        )
        .unwrap();
        assert_eq!(root.children_named("urn:x", "item").count(), 2);
        assert_eq!(root.children_named("urn:y", "item").count(), 0);
    }

    #[test]
    fn test_text_is_unescaped_and_trimmed() {
        let root = parse("<r>\n   A &amp; B  \n</r>").unwrap();
        assert_eq!(root.text, "A & B");
    }

    #[test]
    fn test_text_after_first_child_is_ignored() {
        let root = parse("<r>head<c/>tail</r>").unwrap();
        assert_eq!(root.text, "head");
    }

    #[test]
    fn test_leading_bom_and_declaration() {
        let root = parse("\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?><r/>").unwrap();
        assert_eq!(root.name, "r");
        assert!(root.namespace.is_none());
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err = parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, EvidenceError::Xml { .. }));
    }

    #[test]
    fn test_unclosed_document_is_malformed() {
        let err = parse("<a><b>").unwrap_err();
        assert!(matches!(err, EvidenceError::Xml { .. }));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let err = parse("   ").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }

    #[test]
    fn test_undeclared_prefix_is_malformed() {
        assert!(parse("<x:a/>").is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = parse_file(Path::new("/nonexistent/stig.xml")).unwrap_err();
        assert!(matches!(err, EvidenceError::Read { .. }));
    }
}
