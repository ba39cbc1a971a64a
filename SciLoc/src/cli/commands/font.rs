//! CLI commands for bitmap fonts

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, PICTURE, print_done, print_step};
use crate::converter::font_png::{convert_png_dir_to_font, export_font_to_png_dir, load_png_dir};
use crate::formats::font::read_font;

/// Export every glyph of a font as PNG
pub fn export(font_path: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    if !quiet {
        print_step(1, 2, LOOKING_GLASS, &format!("Reading {}...", font_path.display()));
    }
    let font = read_font(font_path)?;

    if !quiet {
        print_step(2, 2, PICTURE, "Writing glyph images...");
    }
    let written = export_font_to_png_dir(&font, output)?;

    println!(
        "Exported {written} of {} characters to {}",
        font.num_chars(),
        output.display()
    );
    if !quiet {
        print_done(started.elapsed());
    }
    Ok(())
}

/// Build a font from a PNG glyph directory
pub fn build(input: &Path, output: &Path, line_height: u16, reserved: u32) -> anyhow::Result<()> {
    let started = Instant::now();
    if !input.is_dir() {
        anyhow::bail!("Input directory not found: {}", input.display());
    }

    print_step(1, 2, GEAR, &format!("Reading glyphs from {}...", input.display()));
    let grids = load_png_dir(input)?;
    if grids.is_empty() {
        anyhow::bail!("No PNG files found in {}", input.display());
    }
    let first = grids.keys().next().copied().unwrap_or_default();
    let last = grids.keys().next_back().copied().unwrap_or_default();
    println!("  Character range: {first} to {last}");
    println!("  Total characters: {}", last + 1);
    println!("  Line height: {line_height}");

    print_step(2, 2, DISK, "Writing font...");
    let font_path = convert_png_dir_to_font(input, output, reserved, line_height)?;
    let size = std::fs::metadata(&font_path)?.len();

    println!("Created font file: {} ({size} bytes)", font_path.display());
    print_done(started.elapsed());
    Ok(())
}

/// Show font header fields and glyph statistics
pub fn info(font_path: &Path) -> anyhow::Result<()> {
    let font = read_font(font_path)?;

    println!("Font Information: {}", font_path.display());
    println!("  Reserved data: {:#x}", font.reserved);
    println!("  Number of characters: {}", font.num_chars());
    println!("  Drawable characters: {}", font.drawable_count());
    println!("  Line height: {} pixels", font.line_height);

    let widest = font.glyphs.iter().map(|g| g.width).max().unwrap_or(0);
    let tallest = font.glyphs.iter().map(|g| g.height).max().unwrap_or(0);
    println!("  Largest glyph: {widest}x{tallest}");

    Ok(())
}
