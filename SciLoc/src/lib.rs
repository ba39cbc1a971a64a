//! # SciLoc
//!
//! A pure-Rust library for localizing games built on Sierra's SCI engine.
//!
//! ## Supported Formats
//!
//! - **Fonts** (`font.*`) - 1-bit glyph tables, exported as PNG directories
//! - **Messages** (`*.msg`) - noun/verb/case/sequence message tables, exported as CSV
//! - **Text resources** (`*.tex`, `text.*`) - NUL-terminated string lists, exported as TSV
//!
//! Every codec round-trips byte for byte: parsing a resource and building it
//! again with the same codepage yields the original bytes.
//!
//! ## Quick Start
//!
//! ### Working with Message Tables
//!
//! ```no_run
//! use sciloc::formats::msg::{read_msg, write_msg};
//!
//! let mut table = read_msg("1000.msg")?;
//! for record in &table.records {
//!     println!("{:?}: {}", record.key(), record.text);
//! }
//!
//! table.records[0].text = "שלום".to_string();
//! write_msg("1000_new.msg", &table)?;
//! # Ok::<(), sciloc::Error>(())
//! ```
//!
//! ### Converting Fonts
//!
//! ```no_run
//! use sciloc::converter::{convert_font_to_png_dir, convert_png_dir_to_font};
//!
//! convert_font_to_png_dir("font.000", "fonts/000")?;
//! // ...edit the glyph images...
//! let font_path = convert_png_dir_to_font("fonts/000", "out", 0x87, 12)?;
//! # Ok::<(), sciloc::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use sciloc::prelude::*;
//!
//! let resource = TextResource::from_strings(["Hello"]);
//! let built = build_text_bytes(&resource)?;
//! assert_eq!(built.bytes, b"\x83\x00Hello\x00");
//! # Ok::<(), sciloc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `sciloc` command-line binary

pub mod batch;
pub mod config;
pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::CodecOptions;
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{Codepage, Diagnostic, FallbackChain};
    pub use crate::formats::font::{
        FontTable, Glyph, GlyphGrid, build_font_bytes, parse_font_bytes, read_font, write_font,
    };
    pub use crate::formats::msg::{
        MessageRecord, MessageTable, build_msg_bytes, parse_msg_bytes, read_msg, write_msg,
    };
    pub use crate::formats::text::{
        TextResource, build_text_bytes, parse_text_bytes, read_text, write_text,
    };

    pub use crate::batch::{BatchResult, ResourceKind, batch_convert, find_resource_files};
    pub use crate::converter;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
