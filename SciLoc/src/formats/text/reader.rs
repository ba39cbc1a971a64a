//! Text resource reading and parsing

use std::path::Path;

use super::{TextResource, DEFAULT_CODEPAGE, TEXT_MAGIC};
use crate::error::Result;
use crate::formats::common::{ByteReader, Codepage, Diagnostic};

/// A parsed text resource plus what was noticed while reading it
#[derive(Debug, Clone, Default)]
pub struct ParsedText {
    pub resource: TextResource,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read a text resource from disk, decoding strings as Windows-1255
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, or
/// [`Error::TruncatedInput`] if it is shorter than the magic.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<ParsedText> {
    let data = std::fs::read(path)?;
    parse_text_bytes(&data)
}

/// Parse a text resource, decoding strings as Windows-1255
///
/// # Errors
/// Returns [`Error::TruncatedInput`] if `data` is shorter than the magic.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn parse_text_bytes(data: &[u8]) -> Result<ParsedText> {
    parse_text_bytes_with(data, DEFAULT_CODEPAGE)
}

/// Parse a text resource, decoding every string with `codepage`
///
/// A magic mismatch is reported as [`Diagnostic::MalformedHeader`] and the
/// two bytes are skipped anyway. A string that does not decode becomes an
/// empty string and is reported as [`Diagnostic::UndecodableText`]; the
/// rest of the resource is unaffected. Bytes after the last NUL are ignored.
///
/// # Errors
/// Returns [`Error::TruncatedInput`] if `data` is shorter than the magic.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn parse_text_bytes_with(data: &[u8], codepage: Codepage) -> Result<ParsedText> {
    let mut reader = ByteReader::new(data);
    let mut diagnostics = Vec::new();

    let magic: [u8; 2] = reader.read_array()?;
    if magic != TEXT_MAGIC {
        tracing::warn!(
            "Unexpected text resource header: {:02x}{:02x}",
            magic[0],
            magic[1]
        );
        diagnostics.push(Diagnostic::MalformedHeader {
            expected: TEXT_MAGIC.to_vec(),
            found: magic.to_vec(),
        });
    }

    let body = reader.read_bytes(reader.remaining())?;
    let mut chunks: Vec<&[u8]> = body.split(|&b| b == 0).collect();
    // The final NUL ends the stream; whatever follows it is not a string
    let trailing = chunks.pop().unwrap_or_default();
    if !trailing.is_empty() {
        tracing::warn!("Ignoring {} unterminated bytes at end of text resource", trailing.len());
    }

    let mut strings = Vec::with_capacity(chunks.len());
    for (index, raw) in chunks.into_iter().enumerate() {
        if let Some(text) = codepage.decode(raw) {
            strings.push(text);
        } else {
            tracing::warn!("Could not decode string {index} as {codepage}");
            diagnostics.push(Diagnostic::UndecodableText { index, codepage });
            strings.push(String::new());
        }
    }

    Ok(ParsedText {
        resource: TextResource { strings },
        diagnostics,
    })
}
