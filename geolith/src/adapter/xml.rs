//! Minimal element tree on top of `quick-xml`, enough for the XML based adapters.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::GeolithError;

const EXCERPT_RADIUS: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// Element with its lowercase local name and the byte span it occupies in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlElement {
    pub name: String,
    pub children: Vec<XmlNode>,
    span: (usize, usize),
}

impl XmlElement {
    fn new(name: &[u8], start: usize) -> Self {
        Self {
            name: String::from_utf8_lossy(name).to_lowercase(),
            children: vec![],
            span: (start, start),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn child<'a>(&'a self, name: &'a str) -> Option<&'a XmlElement> {
        self.children_named(name).next()
    }

    /// All descendants with the given name, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = vec![];
        for element in self.elements() {
            if element.name == name {
                found.push(element);
            }
            found.extend(element.descendants_named(name));
        }
        found
    }

    /// Concatenated text of the element and all its descendants.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, buffer: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => buffer.push_str(t),
                XmlNode::Element(e) => e.collect_text(buffer),
            }
        }
    }

    /// Source text of the element.
    pub fn source<'a>(&self, document: &'a str) -> &'a str {
        document
            .get(self.span.0..self.span.1)
            .map(str::trim)
            .unwrap_or(document)
    }
}

/// Parses the document into the tree of its root element.
///
/// Character data sections, comments and processing instructions are skipped.
pub(crate) fn parse_document(text: &str, format: &'static str) -> Result<XmlElement, GeolithError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = vec![];
    let mut root: Option<XmlElement> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                let position = reader.error_position() as usize;
                return Err(GeolithError::parse(
                    format,
                    excerpt(text, position),
                    err.to_string(),
                ));
            }
        };

        match event {
            Event::Start(e) => stack.push(XmlElement::new(e.local_name().as_ref(), start)),
            Event::Empty(e) => {
                let mut element = XmlElement::new(e.local_name().as_ref(), start);
                element.span.1 = reader.buffer_position() as usize;
                attach(element, &mut stack, &mut root, text, format)?;
            }
            Event::End(_) => {
                let Some(mut element) = stack.pop() else {
                    return Err(GeolithError::parse(
                        format,
                        excerpt(text, start),
                        "unexpected closing tag",
                    ));
                };
                element.span.1 = reader.buffer_position() as usize;
                attach(element, &mut stack, &mut root, text, format)?;
            }
            Event::Text(t) => {
                let value = t.unescape().map_err(|err| {
                    GeolithError::parse(format, excerpt(text, start), err.to_string())
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(value.into_owned())),
                    None => log::debug!("Ignoring text outside of the root element"),
                }
            }
            Event::CData(_) => log::debug!("Ignoring CDATA section at {start}"),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(GeolithError::parse(
            format,
            excerpt(text, unclosed.span.0),
            format!("element <{}> is not closed", unclosed.name),
        ));
    }

    root.ok_or_else(|| GeolithError::parse(format, excerpt(text, 0), "document has no root element"))
}

fn attach(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    text: &str,
    format: &'static str,
) -> Result<(), GeolithError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(GeolithError::parse(
            format,
            element.source(text),
            "document has more than one root element",
        ));
    }

    *root = Some(element);
    Ok(())
}

/// Piece of the document around the byte position.
fn excerpt(text: &str, position: usize) -> &str {
    let mut from = position.saturating_sub(EXCERPT_RADIUS).min(text.len());
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (position + EXCERPT_RADIUS).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }

    text[from..to].trim()
}
