//! Streaming XML reader implementation

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::xml::cursor::Cursor;
use crate::xml::encoding::BOM;
use crate::xml::error::{Error, ErrorKind, Result, Span};
use crate::xml::event::Event;

/// Configuration for the XML reader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Streaming XML reader
///
/// Emits [`Event`]s for elements and character data. Prolog and epilog
/// markup (declaration, comments, processing instructions, DOCTYPE) is
/// consumed silently. A document without any element is accepted and
/// yields no events.
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    input_len: usize,
    /// Names of currently open elements
    open: Vec<String>,
    /// End event owed for a self-closing tag
    pending_end: Option<String>,
    root_seen: bool,
    size_checked: bool,
}

impl<'a> Parser<'a> {
    /// Create a new reader with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        let input_len = input.len();
        let input = input.strip_prefix(BOM).unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            config,
            input_len,
            open: Vec::new(),
            pending_end: None,
            root_seen: false,
            size_checked: false,
        }
    }

    /// Current element nesting depth
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Get the next event, or `None` once the document is complete
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if !self.size_checked {
            self.size_checked = true;
            if self.config.max_size > 0 && self.input_len > self.config.max_size {
                return Err(Error::at(
                    ErrorKind::MaxSizeExceeded {
                        max: self.config.max_size,
                    },
                    self.cursor.position(),
                ));
            }
        }

        if let Some(name) = self.pending_end.take() {
            self.open.pop();
            return Ok(Some(Event::End { name }));
        }

        loop {
            if self.open.is_empty() {
                match self.next_outside_root()? {
                    Some(event) => return Ok(Some(event)),
                    None if self.cursor.is_eof() => return Ok(None),
                    None => continue,
                }
            }

            if let Some(event) = self.next_inside_root()? {
                return Ok(Some(event));
            }
        }
    }

    /// Collect every remaining event
    pub fn events(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    fn next_outside_root(&mut self) -> Result<Option<Event>> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            return Ok(None);
        }

        if self.cursor.current() != Some(b'<') {
            return Err(self.error(ErrorKind::TextOutsideRoot));
        }

        match self.cursor.peek(1) {
            Some(b'?') => self.skip_processing_instruction().map(|()| None),
            Some(b'!') if self.cursor.starts_with(b"<!--") => self.skip_comment().map(|()| None),
            Some(b'!') if !self.root_seen && self.cursor.starts_with(b"<!DOCTYPE") => {
                self.skip_doctype().map(|()| None)
            }
            Some(b'!') => Err(self.error_here("unexpected markup declaration")),
            Some(b'/') => {
                self.cursor.advance_by(2);
                let name = self.parse_name()?;
                Err(self.error(ErrorKind::UnexpectedClosingTag { name }))
            }
            _ if self.root_seen => Err(self.error(ErrorKind::MultipleRoots)),
            _ => {
                self.root_seen = true;
                self.parse_start_tag().map(Some)
            }
        }
    }

    fn next_inside_root(&mut self) -> Result<Option<Event>> {
        if self.cursor.is_eof() {
            return Err(self.error(ErrorKind::UnexpectedEof));
        }

        if self.cursor.current() != Some(b'<') {
            return self.parse_text().map(Some);
        }

        match self.cursor.peek(1) {
            Some(b'/') => self.parse_end_tag().map(Some),
            Some(b'?') => self.skip_processing_instruction().map(|()| None),
            Some(b'!') if self.cursor.starts_with(b"<!--") => self.skip_comment().map(|()| None),
            Some(b'!') if self.cursor.starts_with(b"<![CDATA[") => self.parse_cdata().map(Some),
            Some(b'!') => Err(self.error_here("unexpected markup declaration")),
            _ => self.parse_start_tag().map(Some),
        }
    }

    fn parse_start_tag(&mut self) -> Result<Event> {
        // cursor at '<'
        self.cursor.advance();
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.config.max_depth > 0 && self.open.len() >= usize::from(self.config.max_depth) {
            return Err(self.error(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.pending_end = Some(name.clone());
        } else {
            self.expect_byte(b'>')?;
        }

        self.open.push(name.clone());
        Ok(Event::Start { name, attributes })
    }

    fn parse_end_tag(&mut self) -> Result<Event> {
        // cursor at "</"
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.pop() {
            Some(expected) if expected == name => Ok(Event::End { name }),
            Some(expected) => Err(self.error(ErrorKind::MismatchedTag {
                expected,
                found: name,
            })),
            None => Err(self.error(ErrorKind::UnexpectedClosingTag { name })),
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error(ErrorKind::UnexpectedEof)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error(ErrorKind::DuplicateAttribute { name }));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let normalized = normalize_attribute_value(self.bytes_to_str(raw)?);
                return self.decode_entities(&normalized);
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> Result<Event> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let normalized = normalize_line_endings(self.bytes_to_str(raw)?);
        let text = self.decode_entities(&normalized)?;
        Ok(Event::Text(text))
    }

    fn parse_cdata(&mut self) -> Result<Event> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                let text = normalize_line_endings(self.bytes_to_str(raw)?);
                return Ok(Event::Text(text.into_owned()));
            }
            self.cursor.advance();
        }
        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(self.error(ErrorKind::InvalidName)),
            None => return Err(self.error(ErrorKind::UnexpectedEof)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_str(raw).map(str::to_string)
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    /// Skip `<!DOCTYPE ...>` including any bracketed internal subset
    fn skip_doctype(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!DOCTYPE".len());
        let mut brackets = 0usize;
        let mut quote = None;

        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => return Ok(()),
                _ => {}
            }
        }

        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error(ErrorKind::UnexpectedEof))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{}'", char::from(expected))))
        }
    }

    fn bytes_to_str<'b>(&self, bytes: &'b [u8]) -> Result<&'b str> {
        std::str::from_utf8(bytes).map_err(|_| self.error(ErrorKind::InvalidUtf8))
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }

        let mut result = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(amp) = rest.find('&') {
            let (head, tail) = rest.split_at(amp);
            result.push_str(head);

            let tail = tail.get(1..).unwrap_or_default();
            let Some(semi) = tail.find(';') else {
                return Err(self.error(ErrorKind::InvalidEntity {
                    entity: tail.to_string(),
                }));
            };
            let (entity, after) = tail.split_at(semi);

            match decode_entity(entity) {
                Some(ch) => result.push(ch),
                None => {
                    return Err(self.error(ErrorKind::InvalidEntity {
                        entity: entity.to_string(),
                    }));
                }
            }
            rest = after.get(1..).unwrap_or_default();
        }
        result.push_str(rest);

        Ok(result)
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn error_here(&self, message: impl Into<String>) -> Error {
        let pos = self.cursor.position();
        Error::with_message(ErrorKind::InvalidToken, Span::at(pos), message)
    }
}

/// Fold `\r\n` and lone `\r` into `\n`
fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Literal tabs and line breaks in an attribute value read as single spaces;
/// character references such as `&#10;` are decoded afterwards and survive
fn normalize_attribute_value(input: &str) -> Cow<'_, str> {
    if input.contains(['\t', '\r', '\n']) {
        Cow::Owned(normalize_line_endings(input).replace(['\t', '\n'], " "))
    } else {
        Cow::Borrowed(input)
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => decode_numeric_entity(entity),
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Result<Vec<Event>> {
        Parser::new(input.as_bytes()).events()
    }

    fn kind_of(input: &str) -> Option<ErrorKind> {
        events(input).err().map(|e| e.kind().clone())
    }

    #[test]
    fn test_self_closing_emits_start_and_end() -> Result<()> {
        let events = events("<ldml><identity/></ldml>")?;
        assert_eq!(
            events,
            vec![
                Event::start("ldml"),
                Event::start("identity"),
                Event::end("identity"),
                Event::end("ldml"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_attributes_keep_source_order() -> Result<()> {
        let events = events(r#"<territory type="US" alt='short' draft="contributed"/>"#)?;
        let Some(Event::Start { attributes, .. }) = events.first() else {
            return Err(Error::with_message(ErrorKind::InvalidToken, Span::empty(), "no start"));
        };
        let names: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["type", "alt", "draft"]);
        assert_eq!(attributes.get("alt").map(String::as_str), Some("short"));
        Ok(())
    }

    #[test]
    fn test_prolog_and_doctype_are_skipped() -> Result<()> {
        let input = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE ldml SYSTEM "../../common/dtd/ldml.dtd" [
  <!ENTITY copy "(c)">
]>
<!-- Copyright (c) Unicode -->
<ldml/>
"#;
        assert_eq!(events(input)?, vec![Event::start("ldml"), Event::end("ldml")]);
        Ok(())
    }

    #[test]
    fn test_text_entities_and_cdata() -> Result<()> {
        let events = events("<p>a &amp; b &#x41;<![CDATA[<raw>]]></p>")?;
        assert_eq!(
            events,
            vec![
                Event::start("p"),
                Event::Text("a & b A".to_string()),
                Event::Text("<raw>".to_string()),
                Event::end("p"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_attribute_whitespace_is_normalized() -> Result<()> {
        let events = events("<a note=\"one\r\ntwo\tthree\nfour&#10;five\"/>")?;
        let Some(Event::Start { attributes, .. }) = events.first() else {
            return Err(Error::with_message(ErrorKind::InvalidToken, Span::empty(), "no start"));
        };
        assert_eq!(
            attributes.get("note").map(String::as_str),
            Some("one two three four\nfive")
        );
        Ok(())
    }

    #[test]
    fn test_text_line_endings_are_normalized() -> Result<()> {
        let events = events("<a>x\r\ny\rz<![CDATA[\r\n]]></a>")?;
        assert_eq!(
            events,
            vec![
                Event::start("a"),
                Event::Text("x\ny\nz".to_string()),
                Event::Text("\n".to_string()),
                Event::end("a"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_bom_is_skipped() -> Result<()> {
        let mut input = BOM.to_vec();
        input.extend_from_slice(b"<ldml/>");
        assert_eq!(Parser::new(&input).events()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_document_without_elements() -> Result<()> {
        assert!(events("")?.is_empty());
        assert!(events("<?xml version=\"1.0\"?>\n<!-- nothing -->\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_documents() {
        assert_eq!(
            kind_of("<ldml><identity></ldml>"),
            Some(ErrorKind::MismatchedTag {
                expected: "identity".to_string(),
                found: "ldml".to_string(),
            })
        );
        assert_eq!(kind_of("<ldml>"), Some(ErrorKind::UnexpectedEof));
        assert_eq!(kind_of("<a/><b/>"), Some(ErrorKind::MultipleRoots));
        assert_eq!(kind_of("hello"), Some(ErrorKind::TextOutsideRoot));
        assert_eq!(
            kind_of("</ldml>"),
            Some(ErrorKind::UnexpectedClosingTag {
                name: "ldml".to_string()
            })
        );
        assert_eq!(
            kind_of(r#"<a x="1" x="2"/>"#),
            Some(ErrorKind::DuplicateAttribute {
                name: "x".to_string()
            })
        );
        assert_eq!(
            kind_of("<a>&nbsp;</a>"),
            Some(ErrorKind::InvalidEntity {
                entity: "nbsp".to_string()
            })
        );
        assert_eq!(kind_of("<a><!-- open</a>"), Some(ErrorKind::UnexpectedEof));
        assert_eq!(kind_of("<a x=1/>"), Some(ErrorKind::InvalidToken));
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::new(2, 0);
        let result = Parser::with_config(b"<a><b><c/></b></a>", config).events();
        assert_eq!(
            result.err().map(|e| e.kind().clone()),
            Some(ErrorKind::MaxDepthExceeded { max: 2 })
        );
        assert!(Parser::with_config(b"<a><b/></a>", config).events().is_ok());
    }

    #[test]
    fn test_size_limit() {
        let result = Parser::with_config(b"<ldml></ldml>", Config::new(0, 4)).events();
        assert_eq!(
            result.err().map(|e| e.kind().clone()),
            Some(ErrorKind::MaxSizeExceeded { max: 4 })
        );
        assert!(
            Parser::with_config(b"<ldml></ldml>", Config::unlimited())
                .events()
                .is_ok()
        );
    }

    #[test]
    fn test_error_position() {
        let err = events("<ldml>\n  <identity>\n</ldml>").err();
        assert_eq!(err.map(|e| e.span().start.line), Some(3));
    }
}
