//! Font resource reading and parsing

use std::path::Path;

use super::{FontTable, Glyph};
use crate::error::Result;
use crate::formats::common::{ByteReader, POINTER_BIAS};

/// Read a font resource from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
/// Returns [`Error::TruncatedInput`] if the pointer table or a glyph runs
/// past the end of the file.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn read_font<P: AsRef<Path>>(path: P) -> Result<FontTable> {
    let data = std::fs::read(path)?;
    parse_font_bytes(&data)
}

/// Parse a font resource from bytes
///
/// # Errors
///
/// Returns [`Error::TruncatedInput`] or [`Error::SeekOutOfBounds`] if the
/// header, pointer table, or any glyph lies outside `data`.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
/// [`Error::SeekOutOfBounds`]: crate::Error::SeekOutOfBounds
pub fn parse_font_bytes(data: &[u8]) -> Result<FontTable> {
    let mut reader = ByteReader::new(data);

    // Header (8 bytes)
    let reserved = reader.read_u32()?;
    let num_chars = usize::from(reader.read_u16()?);
    let line_height = reader.read_u16()?;

    tracing::debug!(
        "Font header: reserved={reserved:#x}, chars={num_chars}, line_height={line_height}"
    );

    let pointers = (0..num_chars)
        .map(|_| reader.read_u16())
        .collect::<Result<Vec<_>>>()?;

    let mut glyphs = Vec::with_capacity(num_chars);
    for (index, &pointer) in pointers.iter().enumerate() {
        reader.seek(usize::from(pointer) + POINTER_BIAS)?;

        let width = reader.read_u8()?;
        let height = reader.read_u8()?;
        let mut glyph = Glyph {
            width,
            height,
            bitmap: Vec::new(),
        };

        if glyph.is_empty() {
            tracing::trace!("Glyph {index}: empty ({width}x{height})");
        } else {
            glyph.bitmap = reader.read_bytes(glyph.bitmap_len())?.to_vec();
            tracing::trace!("Glyph {index}: {width}x{height}");
        }
        glyphs.push(glyph);
    }

    Ok(FontTable {
        reserved,
        line_height,
        glyphs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_single_glyph_font() {
        // header, one pointer (10 - 2), glyph 8x1 = 0b11110000
        let data = [
            0x87, 0, 0, 0, 1, 0, 12, 0, // header
            8, 0, // pointer
            8, 1, 0b1111_0000,
        ];
        let font = parse_font_bytes(&data).unwrap();
        assert_eq!(font.reserved, 0x87);
        assert_eq!(font.line_height, 12);
        assert_eq!(font.num_chars(), 1);

        let grid = font.glyphs[0].to_grid();
        assert_eq!(
            grid.rows(),
            vec![vec![true, true, true, true, false, false, false, false]]
        );
    }

    #[test]
    fn test_empty_glyph_reads_no_bitmap() {
        // Two glyphs: an empty one then a 1x1 glyph immediately after it
        let data = [
            0, 0, 0, 0, 2, 0, 8, 0, // header
            10, 0, 12, 0, // pointers
            0, 0, // empty glyph
            1, 1, 0x80,
        ];
        let font = parse_font_bytes(&data).unwrap();
        assert!(font.glyphs[0].is_empty());
        assert!(font.glyphs[0].bitmap.is_empty());
        assert_eq!(font.glyphs[1].bitmap, vec![0x80]);
    }

    #[test]
    fn test_truncated_bitmap() {
        // 16x2 glyph needs 4 bitmap bytes, only 3 present
        let data = [0, 0, 0, 0, 1, 0, 8, 0, 8, 0, 16, 2, 1, 2, 3];
        assert!(matches!(
            parse_font_bytes(&data),
            Err(Error::TruncatedInput { needed: 4, available: 3, .. })
        ));
    }

    #[test]
    fn test_truncated_pointer_table() {
        let data = [0, 0, 0, 0, 3, 0, 8, 0, 8, 0];
        assert!(matches!(
            parse_font_bytes(&data),
            Err(Error::TruncatedInput { offset: 10, .. })
        ));
    }
}
