//! Font ↔ PNG glyph directory conversion
//!
//! Each drawable glyph becomes `<index>.png`: a grayscale image holding only
//! black (background) and white (foreground) pixels. On import any pixel at
//! or above half intensity counts as foreground.

#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{GrayImage, ImageFormat, Luma};

use super::ProgressCallback;
use crate::error::{Error, Result};
use crate::formats::font::{FontTable, Glyph, GlyphGrid, read_font, write_font};

const FOREGROUND: Luma<u8> = Luma([255]);
const BACKGROUND: Luma<u8> = Luma([0]);

/// Encode one glyph as PNG bytes
///
/// # Errors
/// Returns [`Error::Image`] if the glyph is empty or PNG encoding fails.
pub fn glyph_to_png_bytes(glyph: &Glyph) -> Result<Vec<u8>> {
    let width = u32::from(glyph.width);
    let height = u32::from(glyph.height);
    let img = GrayImage::from_fn(width, height, |x, y| {
        if glyph.pixel(x as usize, y as usize) {
            FOREGROUND
        } else {
            BACKGROUND
        }
    });

    let mut png_data = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut png_data))?;
    Ok(png_data)
}

/// Decode a PNG image into a pixel grid
///
/// # Errors
/// Returns [`Error::Image`] if the data is not a readable PNG.
pub fn png_bytes_to_grid(data: &[u8]) -> Result<GlyphGrid> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Png)?.to_luma8();
    let mut grid = GlyphGrid::new(img.width() as usize, img.height() as usize);
    for (x, y, pixel) in img.enumerate_pixels() {
        grid.set(x as usize, y as usize, pixel.0[0] >= 128);
    }
    Ok(grid)
}

/// Write every drawable glyph of `font` to `dir` as `<index>.png`
///
/// Empty glyphs produce no file. Returns the number of images written.
///
/// # Errors
/// Returns an error if the directory cannot be created or an image fails to encode.
pub fn export_font_to_png_dir<P: AsRef<Path>>(font: &FontTable, dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = 0;
    for (index, glyph) in font.glyphs.iter().enumerate() {
        if glyph.is_empty() {
            tracing::trace!("Character {index}: empty");
            continue;
        }
        let png = glyph_to_png_bytes(glyph)?;
        std::fs::write(dir.join(format!("{index}.png")), png)?;
        written += 1;
    }

    tracing::info!("Exported {written} glyphs to {}", dir.display());
    Ok(written)
}

/// Load `<index>.png` files from `dir` into an index → grid mapping
///
/// Files whose stem is not a number are skipped. An image that cannot be
/// decoded keeps its slot as an empty glyph.
///
/// # Errors
/// Returns an error if the directory cannot be listed.
pub fn load_png_dir<P: AsRef<Path>>(dir: P) -> Result<BTreeMap<usize, GlyphGrid>> {
    let mut grids = BTreeMap::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        {
            continue;
        }

        let Some(index) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<usize>().ok())
        else {
            tracing::debug!("Skipping non-numeric file: {}", path.display());
            continue;
        };

        let grid = match std::fs::read(&path)
            .map_err(Error::from)
            .and_then(|data| png_bytes_to_grid(&data))
        {
            Ok(grid) => grid,
            Err(e) => {
                tracing::warn!("Error reading {}: {e}; using empty glyph", path.display());
                GlyphGrid::new(0, 0)
            }
        };
        grids.insert(index, grid);
    }

    Ok(grids)
}

/// Default font file name for a glyph directory: `font.<dirname>`
///
/// # Errors
/// Returns [`Error::InvalidPath`] if `dir` has no final component.
pub fn font_name_for_dir(dir: &Path) -> Result<String> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPath(dir.to_path_buf()))?;
    Ok(format!("font.{name}"))
}

/// Extract every glyph of a font file into a PNG directory
///
/// # Errors
/// Returns an error if the font cannot be parsed or images cannot be written.
pub fn convert_font_to_png_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    font_path: P,
    output_dir: Q,
) -> Result<usize> {
    convert_font_to_png_dir_with_progress(font_path, output_dir, &|_| {})
}

/// Extract every glyph of a font file into a PNG directory with progress
///
/// # Errors
/// Returns an error if the font cannot be parsed or images cannot be written.
pub fn convert_font_to_png_dir_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    font_path: P,
    output_dir: Q,
    progress: ProgressCallback,
) -> Result<usize> {
    progress("Reading font...");
    let font = read_font(font_path)?;
    progress("Writing glyph images...");
    export_font_to_png_dir(&font, output_dir)
}

/// Build `<output_dir>/font.<dirname>` from a PNG glyph directory
///
/// Returns the path of the written font.
///
/// # Errors
/// Returns an error if no numbered PNG is found, a glyph is too large, or
/// the font cannot be written.
pub fn convert_png_dir_to_font<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    reserved: u32,
    line_height: u16,
) -> Result<PathBuf> {
    let input_dir = input_dir.as_ref();
    let grids = load_png_dir(input_dir)?;
    if grids.is_empty() {
        return Err(Error::InvalidPath(input_dir.to_path_buf()));
    }

    let font = FontTable::from_grids(&grids, reserved, line_height)?;
    tracing::info!(
        "Building font: {} slots, {} drawable, line height {line_height}",
        font.num_chars(),
        font.drawable_count()
    );

    std::fs::create_dir_all(output_dir.as_ref())?;
    let output = output_dir.as_ref().join(font_name_for_dir(input_dir)?);
    write_font(&output, &font)?;
    Ok(output)
}
