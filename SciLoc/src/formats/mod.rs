//! Codecs for SCI localization resources
//!
//! Each format has a `parse_*_bytes`/`build_*_bytes` pair over byte
//! buffers and `read_*`/`write_*` wrappers over paths.

pub mod common;
pub mod font;
pub mod msg;
pub mod text;

// Re-export shared building blocks
pub use common::{ByteReader, ByteWriter, Codepage, Diagnostic, FallbackChain};

// Re-export main resource types
pub use font::{FontTable, Glyph, GlyphGrid, read_font, write_font};
pub use msg::{MessageRecord, MessageTable, read_msg, write_msg};
pub use text::{TextResource, read_text, write_text};
