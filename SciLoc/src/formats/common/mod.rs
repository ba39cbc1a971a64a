//! Building blocks shared by every resource codec
//!
//! - [`ByteReader`] / [`ByteWriter`]: bounds-checked little-endian I/O
//! - [`Codepage`] / [`FallbackChain`]: text encodings for resource strings
//! - [`Diagnostic`]: non-fatal problems reported alongside parse results

mod codepage;
mod cursor;

pub use codepage::{Codepage, FallbackChain};
pub use cursor::{ByteReader, ByteWriter};

use std::fmt;

/// Offset bias of on-disk pointers in font and message resources.
///
/// The engine's resource loader adds 2 to every stored pointer, so the
/// tables hold the true file offset minus 2.
pub const POINTER_BIAS: usize = 2;

/// A recoverable problem found while parsing or comparing resources.
///
/// Diagnostics never abort processing; they are logged and handed back to
/// the caller, which decides whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Magic bytes did not match; parsing continued best-effort.
    MalformedHeader {
        expected: Vec<u8>,
        found: Vec<u8>,
    },
    /// A string could not be decoded with the configured codepage.
    UndecodableText {
        /// Position of the string within its resource.
        index: usize,
        codepage: Codepage,
    },
    /// A string was decoded or encoded by a fallback codepage.
    CodepageFallback {
        index: usize,
        expected: Codepage,
        used: Codepage,
    },
    /// Two record collections that should match differ in length.
    InconsistentRecordCount {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedHeader { expected, found } => write!(
                f,
                "unexpected header: expected {}, found {}",
                hex(expected),
                hex(found)
            ),
            Self::UndecodableText { index, codepage } => {
                write!(f, "string {index} is not valid {codepage}, replaced with empty text")
            }
            Self::CodepageFallback {
                index,
                expected,
                used,
            } => write!(f, "string {index} fell back from {expected} to {used}"),
            Self::InconsistentRecordCount { expected, found } => {
                write!(f, "record count mismatch: expected {expected}, found {found}")
            }
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
