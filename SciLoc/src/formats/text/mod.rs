//! SCI text resource format (`.tex` / `text.*`)
//!
//! A flat list of NUL-terminated strings behind a 2-byte magic:
//!
//! ```text
//! 0x83 0x00 | string 0 NUL | string 1 NUL | ...
//! ```
//!
//! There is no count or length field; the last NUL ends the stream. Selector
//! side-tables use the same layout.

mod reader;
mod writer;

pub use reader::{parse_text_bytes, parse_text_bytes_with, read_text, ParsedText};
pub use writer::{build_text_bytes, build_text_bytes_with, write_text, BuiltText};

use crate::formats::common::Codepage;

/// Magic bytes at the start of every text resource
pub const TEXT_MAGIC: [u8; 2] = [0x83, 0x00];

/// Codepage of [`parse_text_bytes`] and [`build_text_bytes`]
pub const DEFAULT_CODEPAGE: Codepage = Codepage::Windows1255;

/// Codepage of the shipped (English) text resources, used as the decode
/// default of [`TextOptions`](crate::config::TextOptions)
pub const SOURCE_CODEPAGE: Codepage = Codepage::Windows1252;

/// An ordered list of strings; position is identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextResource {
    pub strings: Vec<String>,
}

impl TextResource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }
}
