//! Font resource writing

use std::path::Path;

use super::{FontTable, HEADER_SIZE};
use crate::error::{Error, Result};
use crate::formats::common::{ByteWriter, POINTER_BIAS};

/// Write a font resource to disk
///
/// # Errors
/// Returns an error if the font cannot be laid out or the file cannot be written.
pub fn write_font<P: AsRef<Path>>(path: P, font: &FontTable) -> Result<()> {
    let data = build_font_bytes(font)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Serialize a font to bytes
///
/// Glyph payloads are laid out in index order directly after the pointer
/// table; each pointer stores its glyph's true offset minus 2.
///
/// # Errors
/// Returns [`Error::InvalidGlyphIndex`] if there are more than 65535 slots
/// [`Error::BitmapSizeMismatch`] if a glyph's bitmap length does not match
/// its dimensions, and [`Error::FontTooLarge`] if a glyph offset exceeds the
/// 16-bit pointer range.
pub fn build_font_bytes(font: &FontTable) -> Result<Vec<u8>> {
    let num_chars = u16::try_from(font.num_chars()).map_err(|_| {
        Error::InvalidGlyphIndex(format!("{} character slots", font.num_chars()))
    })?;

    let data_start = HEADER_SIZE + font.num_chars() * 2;
    let payload_len: usize = font.glyphs.iter().map(super::Glyph::encoded_len).sum();
    let mut writer = ByteWriter::with_capacity(data_start + payload_len);

    writer.write_u32(font.reserved)?;
    writer.write_u16(num_chars)?;
    writer.write_u16(font.line_height)?;

    let mut offset = data_start;
    for (index, glyph) in font.glyphs.iter().enumerate() {
        if glyph.bitmap.len() != glyph.bitmap_len() {
            return Err(Error::BitmapSizeMismatch {
                index,
                expected: glyph.bitmap_len(),
                found: glyph.bitmap.len(),
            });
        }
        let pointer = u16::try_from(offset - POINTER_BIAS)
            .map_err(|_| Error::FontTooLarge { index, offset })?;
        writer.write_u16(pointer)?;
        offset += glyph.encoded_len();
    }

    for glyph in &font.glyphs {
        writer.write_u8(glyph.width)?;
        writer.write_u8(glyph.height)?;
        writer.write_bytes(&glyph.bitmap)?;
    }

    tracing::debug!(
        "Built font: {} slots, {} drawable, {} bytes",
        font.num_chars(),
        font.drawable_count(),
        writer.len()
    );

    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::font::{parse_font_bytes, Glyph, GlyphGrid, DEFAULT_RESERVED};
    use std::collections::BTreeMap;

    #[test]
    fn test_pointer_layout() {
        let mut font = FontTable::new(12);
        font.glyphs = vec![
            Glyph::empty(),
            Glyph {
                width: 8,
                height: 1,
                bitmap: vec![0xF0],
            },
        ];
        let data = build_font_bytes(&font).unwrap();
        assert_eq!(
            data,
            vec![
                0x87, 0, 0, 0, 2, 0, 12, 0, // header
                10, 0, 12, 0, // pointers: 12 - 2, 14 - 2
                0, 0, // empty glyph
                8, 1, 0xF0,
            ]
        );
    }

    #[test]
    fn test_round_trip_bytes() {
        let data = vec![
            0x10, 0x20, 0x30, 0x40, 3, 0, 9, 0, // header
            12, 0, 14, 0, 18, 0, // pointers
            0, 0, // empty
            9, 1, 0xFF, 0x80, // 9 wide, 2 bytes per row
            3, 2, 0xA0, 0x40,
        ];
        let font = parse_font_bytes(&data).unwrap();
        assert_eq!(font.reserved, 0x40302010);
        assert_eq!(build_font_bytes(&font).unwrap(), data);
    }

    #[test]
    fn test_sparse_glyphs_gap_filled() {
        let mut grids = BTreeMap::new();
        grids.insert(5, GlyphGrid::from_rows(&[vec![true, false, true]]));
        grids.insert(9, GlyphGrid::from_rows(&[vec![true], vec![true]]));
        let font = FontTable::from_grids(&grids, DEFAULT_RESERVED, 12).unwrap();

        let parsed = parse_font_bytes(&build_font_bytes(&font).unwrap()).unwrap();
        assert_eq!(parsed.num_chars(), 10);
        for i in [0, 1, 2, 3, 4, 6, 7, 8] {
            assert_eq!(parsed.glyphs[i].width, 0);
            assert_eq!(parsed.glyphs[i].height, 0);
            assert!(parsed.glyphs[i].bitmap.is_empty());
        }
        assert_eq!(parsed.to_grids(), grids);
    }

    #[test]
    fn test_pointer_overflow_rejected() {
        let mut font = FontTable::new(12);
        let big = Glyph {
            width: 255,
            height: 255,
            bitmap: vec![0; 32 * 255],
        };
        font.glyphs = vec![big; 10];
        assert!(matches!(
            build_font_bytes(&font),
            Err(Error::FontTooLarge { .. })
        ));
    }

    #[test]
    fn test_bitmap_length_must_match_dimensions() {
        let mut font = FontTable::new(12);
        font.glyphs = vec![
            Glyph::empty(),
            Glyph {
                width: 9,
                height: 2,
                // 9 pixels wide needs 2 bytes per row
                bitmap: vec![0xFF, 0xFF, 0x80],
            },
        ];
        assert!(matches!(
            build_font_bytes(&font),
            Err(Error::BitmapSizeMismatch {
                index: 1,
                expected: 4,
                found: 3,
            })
        ));

        font.glyphs[1].bitmap.push(0x80);
        assert!(build_font_bytes(&font).is_ok());
    }
}
