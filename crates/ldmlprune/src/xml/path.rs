//! Flattening of XML events into path/value records

use std::fmt;

use indexmap::IndexMap;

use crate::xml::encoding;
use crate::xml::error::Result;
use crate::xml::event::Event;
use crate::xml::parser::{Config, Parser};

/// One leaf of a flattened document
///
/// `path` is the element chain from the root with attributes rendered
/// inline, e.g. `/ldml/identity/language[@type="en"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathValue {
    pub path: String,
    pub value: String,
}

impl PathValue {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.path, self.value)
    }
}

/// Turns a stream of [`Event`]s into [`PathValue`] records
///
/// Only leaf elements (no child elements) produce a record. Character data
/// is collected from an element's start tag until its first child or its
/// end tag, so text mixed in with child elements is dropped.
#[derive(Debug, Default)]
pub struct Flattener {
    /// Full paths of the open elements
    stack: Vec<String>,
    chars: String,
    last_is_start: bool,
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event; returns a record when a leaf element closes
    pub fn push(&mut self, event: Event) -> Option<PathValue> {
        match event {
            Event::Start { name, attributes } => {
                let parent = self.stack.last().map_or("", String::as_str);
                let path = element_path(parent, &name, &attributes);
                self.stack.push(path);
                self.chars.clear();
                self.last_is_start = true;
                None
            }
            Event::Text(text) => {
                if self.last_is_start {
                    self.chars.push_str(&text);
                }
                None
            }
            Event::End { .. } => {
                let path = self.stack.pop();
                let record = match path {
                    Some(path) if self.last_is_start => {
                        Some(PathValue::new(path, std::mem::take(&mut self.chars)))
                    }
                    _ => None,
                };
                self.chars.clear();
                self.last_is_start = false;
                record
            }
        }
    }
}

/// Render `parent/name[@attr="value"]...`
pub fn element_path(parent: &str, name: &str, attributes: &IndexMap<String, String>) -> String {
    let mut path = String::with_capacity(parent.len() + name.len() + 1);
    path.push_str(parent);
    path.push('/');
    path.push_str(name);
    for (key, value) in attributes {
        path.push_str("[@");
        path.push_str(key);
        path.push_str("=\"");
        path.push_str(&value.replace('"', "'"));
        path.push_str("\"]");
    }
    path
}

/// Flatten a document, passing every value through `filter`
///
/// Records whose value the filter maps to `None` are dropped.
pub fn flatten_with<F>(input: &[u8], config: Config, mut filter: F) -> Result<Vec<PathValue>>
where
    F: FnMut(String) -> Option<String>,
{
    let input = encoding::to_utf8(input)?;
    let mut parser = Parser::with_config(&input, config);
    let mut flattener = Flattener::new();
    let mut records = Vec::new();

    while let Some(event) = parser.next_event()? {
        if let Some(record) = flattener.push(event) {
            if let Some(value) = filter(record.value) {
                records.push(PathValue::new(record.path, value));
            }
        }
    }

    Ok(records)
}

/// Flatten a document with the given reader configuration
pub fn flatten_bytes_with_config(input: &[u8], config: Config) -> Result<Vec<PathValue>> {
    flatten_with(input, config, Some)
}

/// Flatten a document from bytes
pub fn flatten_bytes(input: &[u8]) -> Result<Vec<PathValue>> {
    flatten_bytes_with_config(input, Config::default())
}

/// Flatten a document from a string
pub fn flatten_str(input: &str) -> Result<Vec<PathValue>> {
    flatten_bytes(input.as_bytes())
}
