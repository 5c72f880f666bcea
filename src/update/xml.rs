//! Element-text updates for XML descriptors.
//!
//! The document keeps its source text and the byte span of every
//! `quick-xml` event read from it, plus an index of elements pointing into
//! that list. Only the text of changed elements is re-emitted; every other
//! event (comments, processing instructions, the declaration, the doctype,
//! whitespace, attributes, end tags) is copied from the source bytes.

use crate::domain::{Change, FileUpdate, OverrideSet};
use crate::error::{Result, UpdateError};
use crate::utils::{atomic_write, read_text_file};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

/// Well-formedness failure, located by byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    pub position: u64,
    pub message: String,
}

impl XmlError {
    fn new(position: u64, message: impl Into<String>) -> Self {
        Self { position, message: message.into() }
    }

    fn into_update_error(self, path: &Path) -> UpdateError {
        UpdateError::MalformedDocument {
            path: path.to_path_buf(),
            position: self.position,
            message: self.message,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    /// Index of the element's `Start` or `Empty` event.
    event: usize,
    self_closing: bool,
    /// Text and CDATA events between the start tag and the first child node.
    text_events: Range<usize>,
    /// Unescaped text content.
    text: String,
    modified: bool,
}

/// An XML document that can have element text replaced in place.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    source: String,
    /// Source byte range of each event, in reading order.
    spans: Vec<Range<usize>>,
    elements: Vec<Element>,
}

impl XmlDocument {
    /// Parse a document, rejecting anything that is not well-formed.
    pub fn parse(source: &str) -> std::result::Result<Self, XmlError> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);

        let mut spans: Vec<Range<usize>> = Vec::new();
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        // Element still collecting its leading text, if any.
        let mut open_text: Option<usize> = None;
        let mut root_seen = false;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|err| XmlError::new(reader.error_position(), err.to_string()))?;
            let idx = spans.len();

            match &event {
                Event::Eof => break,
                Event::Start(start) | Event::Empty(start) => {
                    if stack.is_empty() {
                        if root_seen {
                            return Err(XmlError::new(position, "more than one root element"));
                        }
                        root_seen = true;
                    }
                    let self_closing = matches!(event, Event::Empty(_));
                    elements.push(Element {
                        name: qualified_name(start),
                        event: idx,
                        self_closing,
                        text_events: idx + 1..idx + 1,
                        text: String::new(),
                        modified: false,
                    });
                    open_text = if self_closing { None } else { Some(elements.len() - 1) };
                    if !self_closing {
                        stack.push(elements.len() - 1);
                    }
                }
                Event::End(_) => {
                    if stack.pop().is_none() {
                        return Err(XmlError::new(position, "closing tag without opening tag"));
                    }
                    open_text = None;
                }
                Event::Text(text) => {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| XmlError::new(position, err.to_string()))?;
                    if stack.is_empty() {
                        if !unescaped.trim().is_empty() {
                            return Err(XmlError::new(position, "text outside the root element"));
                        }
                    } else if let Some(el) = open_text {
                        elements[el].text.push_str(&unescaped);
                        elements[el].text_events.end = idx + 1;
                    }
                }
                Event::CData(cdata) => {
                    if stack.is_empty() {
                        return Err(XmlError::new(position, "CDATA outside the root element"));
                    }
                    if let Some(el) = open_text {
                        elements[el].text.push_str(&String::from_utf8_lossy(cdata));
                        elements[el].text_events.end = idx + 1;
                    }
                }
                Event::Comment(_) | Event::PI(_) => open_text = None,
                Event::Decl(_) | Event::DocType(_) => {}
            }

            spans.push(position as usize..reader.buffer_position() as usize);
        }

        if let Some(&el) = stack.last() {
            return Err(XmlError::new(
                source.len() as u64,
                format!("unclosed element <{}>", elements[el].name),
            ));
        }
        if !root_seen {
            return Err(XmlError::new(0, "no root element"));
        }

        Ok(Self { source: source.to_string(), spans, elements })
    }

    /// Set the text of every element named like an override key, in
    /// document order, wherever it differs from the desired value.
    pub fn apply(&mut self, overrides: &OverrideSet) -> Vec<Change> {
        let mut changes = Vec::new();
        for (key, desired) in overrides.iter() {
            for element in self.elements.iter_mut().filter(|el| el.name == key) {
                if element.text == desired {
                    continue;
                }
                changes.push(Change {
                    key: element.name.clone(),
                    old: std::mem::replace(&mut element.text, desired.to_string()),
                    new: desired.to_string(),
                });
                element.modified = true;
            }
        }
        changes
    }

    /// Text of each element with the given tag name, in document order.
    #[cfg(test)]
    pub(crate) fn texts(&self, name: &str) -> Vec<&str> {
        self.elements.iter().filter(|el| el.name == name).map(|el| el.text.as_str()).collect()
    }

    /// Serialize the document, re-emitting only modified element text.
    pub fn to_xml_string(&self) -> String {
        let modified: HashMap<usize, &Element> =
            self.elements.iter().filter(|el| el.modified).map(|el| (el.event, el)).collect();

        let mut out = String::with_capacity(self.source.len());
        let mut idx = 0;
        while idx < self.spans.len() {
            let raw = &self.source[self.spans[idx].clone()];
            match modified.get(&idx) {
                Some(el) if !el.self_closing => {
                    out.push_str(raw);
                    out.push_str(&escape(el.text.as_str()));
                    idx = el.text_events.end;
                    continue;
                }
                Some(el) if !el.text.is_empty() => {
                    let open = raw.strip_suffix("/>").unwrap_or(raw);
                    out.push_str(open);
                    out.push('>');
                    out.push_str(&escape(el.text.as_str()));
                    out.push_str("</");
                    out.push_str(&el.name);
                    out.push('>');
                }
                _ => out.push_str(raw),
            }
            idx += 1;
        }
        out
    }
}

fn qualified_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Apply overrides to one XML descriptor, writing it back unless simulating.
pub fn update_xml_file(path: &Path, overrides: &OverrideSet, simulate: bool) -> Result<FileUpdate> {
    let file = read_text_file(path).map_err(|err| UpdateError::file_access(path, err))?;
    let mut document =
        XmlDocument::parse(&file.content).map_err(|err| err.into_update_error(path))?;

    let changes = document.apply(overrides);

    let written = !simulate && !changes.is_empty();
    if written {
        atomic_write(path, &file.encode(&document.to_xml_string()))
            .map_err(|err| UpdateError::file_access(path, err))?;
    }

    tracing::debug!(
        path = %path.display(),
        changes = changes.len(),
        written,
        "Processed XML descriptor"
    );

    Ok(FileUpdate { path: path.to_path_buf(), changes, written })
}
