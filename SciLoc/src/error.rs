//! Error types for `SciLoc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `SciLoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Binary Layout Errors ====================
    /// The buffer is shorter than a declared field or offset demands.
    #[error("truncated input: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        /// Absolute offset of the failed read.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer from `offset`.
        available: usize,
    },

    /// A seek targeted a position outside the buffer.
    #[error("seek to {offset} is past end of buffer (length {len})")]
    SeekOutOfBounds {
        /// Requested absolute position.
        offset: usize,
        /// Buffer length.
        len: usize,
    },

    // ==================== Font Errors ====================
    /// A glyph index does not fit the 16-bit character count.
    #[error("invalid glyph index: {0}")]
    InvalidGlyphIndex(String),

    /// A glyph bitmap exceeds the 255x255 limit of the on-disk dimensions.
    #[error("glyph {index} is too large: {width}x{height} (max 255x255)")]
    GlyphTooLarge {
        /// Character index of the glyph.
        index: usize,
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
    },

    /// The glyph payload pushes an offset past the 16-bit pointer range.
    #[error("font too large: glyph {index} starts at offset {offset}")]
    FontTooLarge {
        /// Character index whose pointer overflowed.
        index: usize,
        /// The true file offset that could not be stored.
        offset: usize,
    },

    /// A glyph's bitmap length disagrees with its width and height.
    #[error("glyph {index} bitmap has {found} bytes, its dimensions need {expected}")]
    BitmapSizeMismatch {
        /// Character index of the glyph.
        index: usize,
        /// Length implied by width and height.
        expected: usize,
        /// Length of the stored bitmap.
        found: usize,
    },

    // ==================== Message Table Errors ====================
    /// The message table has more records or text than 16-bit offsets can address.
    #[error("message table too large: {message}")]
    TableTooLarge {
        /// Description of which limit was exceeded.
        message: String,
    },

    // ==================== Tabular Input Errors ====================
    /// A CSV/TSV row could not be interpreted.
    #[error("invalid row at line {line}: {message}")]
    InvalidRow {
        /// 1-based line number of the row start.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    // ==================== Image Errors ====================
    /// Glyph image encoding or decoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown codepage name in configuration or CLI input.
    #[error("unknown codepage: {0}")]
    UnknownCodepage(String),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),
}

/// A specialized Result type for `SciLoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
