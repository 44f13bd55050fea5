//! Transcoding of non-UTF-8 documents named by the XML declaration

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::xml::cursor::Cursor;
use crate::xml::error::{Error, ErrorKind, Result, Span};

pub(crate) const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read the `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration
pub fn declared_encoding(input: &[u8]) -> Option<&str> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let decl = input.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = decl.get(..end)?;
    let at = decl.windows(8).position(|w| w == b"encoding")?;

    let mut cursor = Cursor::new(decl.get(at + 8..)?);
    cursor.skip_whitespace();
    if !cursor.consume(b'=') {
        return None;
    }
    cursor.skip_whitespace();
    let quote = cursor.current().filter(|&b| matches!(b, b'"' | b'\''))?;
    cursor.advance();

    let start = cursor.pos();
    while cursor.current().is_some_and(|b| b != quote) {
        cursor.advance();
    }
    if cursor.is_eof() {
        return None;
    }
    std::str::from_utf8(cursor.slice_from(start)).ok()
}

/// Return the document as UTF-8, transcoding when the declaration names another encoding
pub fn to_utf8(input: &[u8]) -> Result<Cow<'_, [u8]>> {
    let Some(label) = declared_encoding(input) else {
        return Ok(Cow::Borrowed(input));
    };

    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        Error::new(
            ErrorKind::UnsupportedEncoding {
                label: label.to_string(),
            },
            Span::empty(),
        )
    })?;
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(input));
    }

    let (text, had_errors) = encoding.decode_with_bom_removal(input);
    if had_errors {
        return Err(Error::new(
            ErrorKind::InvalidEncoding {
                label: label.to_string(),
            },
            Span::empty(),
        ));
    }
    Ok(Cow::Owned(text.into_owned().into_bytes()))
}
