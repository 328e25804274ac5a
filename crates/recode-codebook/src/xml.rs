//! Minimal owned element tree over quick-xml events.
//!
//! Terminology documents are small (a few hundred kilobytes at most), so
//! they are parsed eagerly into a tree that the codebook builder can walk
//! with parent/child queries. Only elements, attributes and text content
//! are kept; comments and processing instructions are dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml parse error: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("xml attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("xml encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
    #[error("document has no root element")]
    NoRoot,
    #[error("unexpected closing tag </{0}>")]
    UnbalancedClose(String),
}

/// One XML element with its attributes, direct text and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of an attribute, or the empty string when absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Direct children with the given tag name, in document order. The
    /// returned elements borrow only from `self`, not from `name`.
    pub fn children_named<'s>(&'s self, name: &str) -> impl Iterator<Item = &'s Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First direct child with the given tag name.
    pub fn first_child_named(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    /// All descendants with the given tag name, depth-first.
    pub fn descendants_named<'s>(&'s self, name: &str, out: &mut Vec<&'s Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.descendants_named(name, out);
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut element = Element {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..Element::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Parse an XML document into its root element.
pub fn parse_document(content: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref start) => {
                stack.push(element_from_start(start)?);
            }
            Event::Empty(ref start) => {
                let element = element_from_start(start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(ref text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.decode()?);
                }
            }
            Event::End(ref end) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| XmlError::UnbalancedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    ))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(finished),
                    None => return Ok(finished),
                }
            }
            Event::Eof => return Err(XmlError::NoRoot),
            _ => {}
        }
    }
}
