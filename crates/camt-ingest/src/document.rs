//! Read-only element tree for CAMT.054 documents.
//!
//! The tree is built with `quick-xml`'s namespace-resolving reader. Lookups
//! take a path of local names and only match elements bound to
//! [`CAMT054_NAMESPACE`], so a document in any other namespace parses but
//! contains no statement data. Unbound prefixes and excessive nesting are
//! syntax errors.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::{IngestError, Result, XmlSyntaxError};

/// Namespace of the supported message version.
pub const CAMT054_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:camt.054.001.04";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Deepest element nesting accepted by [`CamtDocument::parse`].
pub const MAX_DEPTH: usize = 256;

/// One XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    in_camt_namespace: bool,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(
        start: &BytesStart<'_>,
        in_camt_namespace: bool,
        reader: &NsReader<&[u8]>,
    ) -> std::result::Result<Self, String> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| e.to_string())?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attribute.key)
                && prefix.as_slice() != b"xml"
            {
                return Err(unbound_prefix(&prefix));
            }
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| e.to_string())?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            in_camt_namespace,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Local name, without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text before the first child element; `None` when there is none.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// Unqualified attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    fn is(&self, name: &str) -> bool {
        self.in_camt_namespace && self.name == name
    }

    /// All elements below this one, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Elements matching `.//first/second/...` relative to this element.
    ///
    /// The first step matches any descendant; each further step matches
    /// direct children. Results are in document order.
    pub fn find_all(&self, path: &[&str]) -> Vec<&Element> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for anchor in self.descendants().filter(|element| element.is(first)) {
            collect_children(anchor, rest, &mut found);
        }
        found
    }

    /// First element matching `.//first/second/...`.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        self.descendants()
            .filter(|element| element.is(first))
            .find_map(|anchor| first_child_path(anchor, rest))
    }

    /// First element matching `.//name[position]`: the `position`-th (1-based)
    /// `name` child of this element or of any of its descendants.
    pub fn find_positional(&self, name: &str, position: usize) -> Option<&Element> {
        let index = position.checked_sub(1)?;
        std::iter::once(self)
            .chain(self.descendants())
            .find_map(|parent| parent.children.iter().filter(|child| child.is(name)).nth(index))
    }

    /// Owned text of the first element matching `path`.
    pub fn find_text(&self, path: &[&str]) -> Option<String> {
        self.find(path)
            .and_then(Element::text)
            .map(str::to_string)
    }
}

fn collect_children<'a>(element: &'a Element, path: &[&str], found: &mut Vec<&'a Element>) {
    match path.split_first() {
        None => found.push(element),
        Some((next, rest)) => {
            for child in element.children.iter().filter(|child| child.is(next)) {
                collect_children(child, rest, found);
            }
        }
    }
}

fn first_child_path<'a>(element: &'a Element, path: &[&str]) -> Option<&'a Element> {
    match path.split_first() {
        None => Some(element),
        Some((next, rest)) => element
            .children
            .iter()
            .filter(|child| child.is(next))
            .find_map(|child| first_child_path(child, rest)),
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed statement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CamtDocument {
    root: Element,
}

impl CamtDocument {
    /// Parse a complete XML document.
    pub fn parse(xml: &[u8]) -> std::result::Result<Self, XmlSyntaxError> {
        let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
        let mut reader = NsReader::from_reader(xml);
        let mut buf = Vec::new();
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let next = reader
                .read_resolved_event_into(&mut buf)
                .map(|(resolved, event)| (camt_namespace_state(&resolved), event));
            let (namespace, event) = match next {
                Ok(next) => next,
                Err(error) => {
                    return Err(XmlSyntaxError::new(
                        error.to_string(),
                        reader.buffer_position() as u64,
                    ));
                }
            };
            let position = reader.buffer_position() as u64;
            let syntax = |message: String| XmlSyntaxError::new(message, position);
            let in_camt_namespace = namespace.map_err(syntax)?;

            match event {
                Event::Start(start) => {
                    check_can_open(&open, root.is_some()).map_err(syntax)?;
                    open.push(Element::open(&start, in_camt_namespace, &reader).map_err(syntax)?);
                }
                Event::Empty(start) => {
                    check_can_open(&open, root.is_some()).map_err(syntax)?;
                    let element =
                        Element::open(&start, in_camt_namespace, &reader).map_err(syntax)?;
                    close(element, &mut open, &mut root);
                }
                Event::End(end) => {
                    let Some(element) = open.pop() else {
                        let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                        return Err(syntax(format!("unexpected closing tag </{name}>")));
                    };
                    close(element, &mut open, &mut root);
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text);
                    let content = quick_xml::escape::unescape(&raw)
                        .map_err(|e| syntax(e.to_string()))?;
                    append_text(&mut open, &content).map_err(syntax)?;
                }
                Event::CData(data) => {
                    let content = String::from_utf8_lossy(&data);
                    append_text(&mut open, &content).map_err(syntax)?;
                }
                Event::GeneralRef(reference) => {
                    let content = match reference.resolve_char_ref() {
                        Ok(Some(ch)) => Cow::Owned(ch.to_string()),
                        Ok(None) => {
                            let name = String::from_utf8_lossy(&reference).into_owned();
                            let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                                .ok_or_else(|| syntax(format!("undefined entity &{name};")))?;
                            Cow::Borrowed(resolved)
                        }
                        Err(error) => return Err(syntax(error.to_string())),
                    };
                    append_text(&mut open, &content).map_err(syntax)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let position = reader.buffer_position() as u64;
        if let Some(unclosed) = open.last() {
            return Err(XmlSyntaxError::new(
                format!("unclosed element <{}>", unclosed.name),
                position,
            ));
        }
        let root = root.ok_or_else(|| XmlSyntaxError::new("no element found", position))?;
        Ok(Self { root })
    }

    /// Read and parse a statement file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes).map_err(|source| IngestError::MalformedDocument {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every `Ntry` element, in document order.
    pub fn entries(&self) -> Vec<&Element> {
        self.root.find_all(&["Ntry"])
    }
}

/// Whether a resolved name is in the CAMT.054 namespace; an unbound prefix
/// is an error.
fn camt_namespace_state(resolved: &ResolveResult<'_>) -> std::result::Result<bool, String> {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) => Ok(*ns == CAMT054_NAMESPACE.as_bytes()),
        ResolveResult::Unbound => Ok(false),
        ResolveResult::Unknown(prefix) => Err(unbound_prefix(prefix)),
    }
}

fn unbound_prefix(prefix: &[u8]) -> String {
    format!("unbound prefix '{}'", String::from_utf8_lossy(prefix))
}

fn check_can_open(open: &[Element], has_root: bool) -> std::result::Result<(), String> {
    if open.is_empty() && has_root {
        return Err("content after the document element".to_string());
    }
    if open.len() >= MAX_DEPTH {
        return Err(format!("elements nested deeper than {MAX_DEPTH} levels"));
    }
    Ok(())
}

fn close(element: Element, open: &mut [Element], root: &mut Option<Element>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(open: &mut [Element], content: &str) -> std::result::Result<(), String> {
    match open.last_mut() {
        Some(current) => {
            if current.children.is_empty() {
                current.text.push_str(content);
            }
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err("text outside the document element".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> CamtDocument {
        let xml = format!(r#"<Document xmlns="{CAMT054_NAMESPACE}">{body}</Document>"#);
        CamtDocument::parse(xml.as_bytes()).expect("well-formed document")
    }

    #[test]
    fn find_matches_descendant_then_children() {
        let document = doc(
            "<A><X><B><C>first</C></B></X><B><C>second</C></B></A><B><C>third</C></B>",
        );
        let root = document.root();
        assert_eq!(root.find_text(&["B", "C"]).as_deref(), Some("first"));
        let all: Vec<_> = root
            .find_all(&["B", "C"])
            .into_iter()
            .filter_map(Element::text)
            .collect();
        assert_eq!(all, vec!["first", "second", "third"]);
    }

    #[test]
    fn find_excludes_the_element_itself() {
        let document = doc("<Amt>1</Amt>");
        let amt = document.root().find(&["Amt"]).unwrap();
        assert!(amt.find(&["Amt"]).is_none());
    }

    #[test]
    fn positional_lookup_counts_siblings() {
        let document = doc("<PstlAdr><AdrLine>one</AdrLine><AdrLine>two</AdrLine></PstlAdr>");
        let address = document.root().find(&["PstlAdr"]).unwrap();
        assert_eq!(address.find_positional("AdrLine", 1).and_then(Element::text), Some("one"));
        assert_eq!(address.find_positional("AdrLine", 2).and_then(Element::text), Some("two"));
        assert!(address.find_positional("AdrLine", 3).is_none());
        assert!(address.find_positional("AdrLine", 0).is_none());
    }

    #[test]
    fn prefixed_namespace_and_attributes() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<c:Document xmlns:c="{CAMT054_NAMESPACE}"><c:Amt Ccy="CHF">12.50</c:Amt></c:Document>"#
        );
        let document = CamtDocument::parse(xml.as_bytes()).unwrap();
        let amt = document.root().find(&["Amt"]).unwrap();
        assert_eq!(amt.text(), Some("12.50"));
        assert_eq!(amt.attr("Ccy"), Some("CHF"));
        assert_eq!(amt.attr("xmlns"), None);
    }

    #[test]
    fn foreign_namespace_never_matches() {
        let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02"><Ntry/></Document>"#;
        let document = CamtDocument::parse(xml.as_bytes()).unwrap();
        assert!(document.entries().is_empty());

        let unqualified = CamtDocument::parse(b"<Document><Ntry/></Document>").unwrap();
        assert!(unqualified.entries().is_empty());
    }

    #[test]
    fn entities_and_cdata_are_resolved() {
        let document = doc("<Nm>Smith &amp; Sons &#65;G</Nm><Ref><![CDATA[a<b]]></Ref>");
        assert_eq!(document.root().find_text(&["Nm"]).as_deref(), Some("Smith & Sons AG"));
        assert_eq!(document.root().find_text(&["Ref"]).as_deref(), Some("a<b"));
    }

    #[test]
    fn empty_elements_have_no_text() {
        let document = doc("<Nm></Nm><Dt/>");
        assert!(document.root().find(&["Nm"]).is_some());
        assert_eq!(document.root().find_text(&["Nm"]), None);
        assert_eq!(document.root().find_text(&["Dt"]), None);
    }

    #[test]
    fn byte_order_mark_is_accepted() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"<Document/>");
        assert!(CamtDocument::parse(&bytes).is_ok());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for xml in [
            "",
            "   ",
            "<Document><Ntry></Document>",
            "<Document>",
            "<Document/><Document/>",
            "<Document/>trailing",
            "not xml at all",
            "<Document><x:Foo/></Document>",
            "<x:Document/>",
            r#"<Document><Amt y:Ccy="CHF">1</Amt></Document>"#,
        ] {
            assert!(CamtDocument::parse(xml.as_bytes()).is_err(), "accepted {xml:?}");
        }
    }

    #[test]
    fn xml_prefix_needs_no_declaration() {
        let document = CamtDocument::parse(br#"<Document xml:lang="de"/>"#).unwrap();
        assert_eq!(document.root().attr("lang"), Some("de"));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn nesting_depth_is_limited() {
        assert!(CamtDocument::parse(nested(MAX_DEPTH).as_bytes()).is_ok());

        let err = CamtDocument::parse(nested(MAX_DEPTH + 1).as_bytes()).unwrap_err();
        assert!(err.to_string().contains("nested deeper"), "{err}");
        assert!(CamtDocument::parse(nested(100_000).as_bytes()).is_err());
    }
}
