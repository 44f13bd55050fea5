//! XML streaming reader events

use indexmap::IndexMap;

/// Events emitted by the streaming XML reader
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Opening tag; attributes keep source order with entities decoded
    Start {
        name: String,
        attributes: IndexMap<String, String>,
    },
    /// Closing tag (also emitted right after a self-closing tag)
    End { name: String },
    /// Character data inside an element, including CDATA sections
    Text(String),
}

impl Event {
    /// Shorthand for a start event without attributes
    pub fn start(name: impl Into<String>) -> Self {
        Self::Start {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        Self::End { name: name.into() }
    }
}
