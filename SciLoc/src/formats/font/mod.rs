//! SCI bitmap font format
//!
//! A font is a table of 1-bit glyphs addressed through a per-glyph pointer
//! table.
//!
//! ```text
//! u32 reserved | u16 num_chars | u16 line_height
//! num_chars × u16 pointer (true offset - 2)
//! per glyph: u8 width, u8 height, height × ceil(width / 8) bitmap bytes
//! ```
//!
//! Bitmaps are row-major and MSB-first; a set bit is a drawn (foreground)
//! pixel. A glyph with a zero width or height is empty and has no bitmap.

mod reader;
mod writer;

pub use reader::{parse_font_bytes, read_font};
pub use writer::{build_font_bytes, write_font};

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Size of the fixed font header (reserved + `num_chars` + `line_height`)
pub const HEADER_SIZE: usize = 8;

/// Reserved header value written by the original font tools
pub const DEFAULT_RESERVED: u32 = 0x87;

/// Default line height for newly built fonts
pub const DEFAULT_LINE_HEIGHT: u16 = 12;

/// One font character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    pub width: u8,
    pub height: u8,
    /// Packed rows, `row_bytes()` bytes each
    pub bitmap: Vec<u8>,
}

impl Glyph {
    /// The empty-glyph sentinel (0x0, no bitmap)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this glyph carries no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per bitmap row
    #[must_use]
    pub fn row_bytes(&self) -> usize {
        usize::from(self.width).div_ceil(8)
    }

    /// Number of bitmap bytes implied by the dimensions
    #[must_use]
    pub fn bitmap_len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.row_bytes() * usize::from(self.height)
        }
    }

    /// Bytes this glyph occupies in the payload section
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + self.bitmap.len()
    }

    /// Whether the pixel at (`x`, `y`) is drawn
    ///
    /// Out-of-range coordinates read as background.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= usize::from(self.width) || y >= usize::from(self.height) {
            return false;
        }
        self.bitmap
            .get(y * self.row_bytes() + x / 8)
            .is_some_and(|byte| (byte >> (7 - x % 8)) & 1 == 1)
    }

    /// Unpack the bitmap into a pixel grid
    #[must_use]
    pub fn to_grid(&self) -> GlyphGrid {
        if self.is_empty() {
            return GlyphGrid::new(0, 0);
        }
        let width = usize::from(self.width);
        let height = usize::from(self.height);
        let mut grid = GlyphGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, self.pixel(x, y));
            }
        }
        grid
    }

    /// Pack a pixel grid into a glyph
    ///
    /// A grid with a zero dimension becomes the empty glyph. `index` is only
    /// used for error reporting.
    ///
    /// # Errors
    /// Returns [`Error::GlyphTooLarge`] if a dimension exceeds 255.
    pub fn from_grid(index: usize, grid: &GlyphGrid) -> Result<Self> {
        if grid.width() == 0 || grid.height() == 0 {
            return Ok(Self::empty());
        }
        let (Ok(width), Ok(height)) = (u8::try_from(grid.width()), u8::try_from(grid.height()))
        else {
            return Err(Error::GlyphTooLarge {
                index,
                width: grid.width(),
                height: grid.height(),
            });
        };

        let row_bytes = grid.width().div_ceil(8);
        let mut bitmap = vec![0u8; row_bytes * grid.height()];
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.get(x, y) {
                    bitmap[y * row_bytes + x / 8] |= 1 << (7 - x % 8);
                }
            }
        }

        Ok(Self {
            width,
            height,
            bitmap,
        })
    }
}

/// Unpacked glyph pixels, `true` = foreground
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl GlyphGrid {
    /// A background-only grid
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Build from rows; short rows are padded with background
    #[must_use]
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &on) in row.iter().enumerate() {
                grid.set(x, y, on);
            }
        }
        grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = on;
        }
    }

    /// Rows of pixels, top to bottom
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<bool>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.pixels.chunks(self.width).map(<[bool]>::to_vec).collect()
    }
}

/// A complete font: header fields plus one glyph per character slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    /// Opaque header field, preserved verbatim
    pub reserved: u32,
    pub line_height: u16,
    /// Glyph for every index `0..num_chars`
    pub glyphs: Vec<Glyph>,
}

impl Default for FontTable {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_HEIGHT)
    }
}

impl FontTable {
    #[must_use]
    pub fn new(line_height: u16) -> Self {
        Self {
            reserved: DEFAULT_RESERVED,
            line_height,
            glyphs: Vec::new(),
        }
    }

    /// Number of character slots
    #[must_use]
    pub fn num_chars(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph at `index`, if the slot exists
    #[must_use]
    pub fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    /// Number of slots holding a drawable glyph
    #[must_use]
    pub fn drawable_count(&self) -> usize {
        self.glyphs.iter().filter(|g| !g.is_empty()).count()
    }

    /// Build a font from an index → pixel grid mapping
    ///
    /// The table covers `0..=max_index`; every index missing from `grids`
    /// (and every degenerate grid) becomes an empty glyph.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGlyphIndex`] if an index does not fit the
    /// 16-bit character count, or [`Error::GlyphTooLarge`] for an oversized grid.
    pub fn from_grids(
        grids: &BTreeMap<usize, GlyphGrid>,
        reserved: u32,
        line_height: u16,
    ) -> Result<Self> {
        let num_chars = grids.keys().next_back().map_or(0, |&max| max + 1);
        if num_chars > usize::from(u16::MAX) {
            return Err(Error::InvalidGlyphIndex(format!(
                "{} exceeds the 16-bit character count",
                num_chars - 1
            )));
        }

        let mut glyphs = vec![Glyph::empty(); num_chars];
        for (&index, grid) in grids {
            glyphs[index] = Glyph::from_grid(index, grid)?;
        }

        Ok(Self {
            reserved,
            line_height,
            glyphs,
        })
    }

    /// Unpack every drawable glyph, keyed by character index
    #[must_use]
    pub fn to_grids(&self) -> BTreeMap<usize, GlyphGrid> {
        self.glyphs
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.is_empty())
            .map(|(i, g)| (i, g.to_grid()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_decoding_msb_first() {
        let glyph = Glyph {
            width: 8,
            height: 1,
            bitmap: vec![0b1111_0000],
        };
        let row: Vec<bool> = (0..8).map(|x| glyph.pixel(x, 0)).collect();
        assert_eq!(
            row,
            vec![true, true, true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_row_bytes_rounds_up() {
        let glyph = Glyph {
            width: 9,
            height: 2,
            bitmap: vec![0; 4],
        };
        assert_eq!(glyph.row_bytes(), 2);
        assert_eq!(glyph.bitmap_len(), 4);
    }

    #[test]
    fn test_grid_packing() {
        let grid = GlyphGrid::from_rows(&[
            vec![true, false, false, false, false, false, false, false, true],
            vec![false, true],
        ]);
        let glyph = Glyph::from_grid(0, &grid).unwrap();
        assert_eq!(glyph.width, 9);
        assert_eq!(glyph.height, 2);
        assert_eq!(glyph.bitmap, vec![0b1000_0000, 0b1000_0000, 0b0100_0000, 0]);
        assert_eq!(glyph.to_grid(), grid);
    }

    #[test]
    fn test_degenerate_grid_is_empty_glyph() {
        let glyph = Glyph::from_grid(3, &GlyphGrid::new(5, 0)).unwrap();
        assert!(glyph.is_empty());
        assert!(glyph.bitmap.is_empty());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let err = Glyph::from_grid(7, &GlyphGrid::new(256, 1)).unwrap_err();
        assert!(matches!(err, Error::GlyphTooLarge { index: 7, width: 256, .. }));
    }

    #[test]
    fn test_from_grids_fills_gaps() {
        let mut grids = BTreeMap::new();
        grids.insert(5, GlyphGrid::from_rows(&[vec![true]]));
        grids.insert(9, GlyphGrid::from_rows(&[vec![true, true]]));
        let font = FontTable::from_grids(&grids, DEFAULT_RESERVED, 10).unwrap();
        assert_eq!(font.num_chars(), 10);
        assert_eq!(font.drawable_count(), 2);
        for i in [0, 1, 2, 3, 4, 6, 7, 8] {
            assert_eq!(font.glyphs[i], Glyph::empty());
        }
    }
}
