//! CLI commands for text resources

use std::path::Path;
use std::time::Instant;

use crate::batch::{ResourceKind, find_resource_files};
use crate::cli::commands::batch::print_summary;
use crate::cli::progress::{GEAR, LOOKING_GLASS, print_done, print_step, print_warning, simple_bar};
use crate::config::TextOptions;
use crate::converter::mapping::{TranslationMapping, translate_text_dir};
use crate::converter::text_tsv::{convert_text_to_tsv, convert_tsv_to_text};
use crate::formats::common::Codepage;

/// Export a text resource to TSV
pub fn export(path: &Path, output: &Path, decode: Codepage) -> anyhow::Result<()> {
    let (tsv_path, count, diagnostics) = convert_text_to_tsv(path, output, decode)?;
    for diagnostic in &diagnostics {
        print_warning(&diagnostic.to_string());
    }
    println!("Converted {count} entries to {}", tsv_path.display());
    Ok(())
}

/// Build a text resource (and selector file) from TSV
pub fn build(
    tsv_path: &Path,
    output: &Path,
    options: &TextOptions,
    with_selector: bool,
) -> anyhow::Result<()> {
    let result = convert_tsv_to_text(tsv_path, output, &options.encode_chain(), with_selector)?;
    for diagnostic in &result.diagnostics {
        print_warning(&diagnostic.to_string());
    }

    println!(
        "Converted {} entries to {}",
        result.entries,
        result.text_path.display()
    );
    match &result.selector_path {
        Some(path) => println!("Selectors written to {}", path.display()),
        None => println!("Skipping selector file creation"),
    }
    Ok(())
}

/// Translate every text resource in a directory
pub fn translate(
    input: &Path,
    output: &Path,
    mapping_path: &Path,
    options: &TextOptions,
) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 2, LOOKING_GLASS, "Loading mapping...");
    let mapping = TranslationMapping::load(mapping_path)?;
    println!("  Loaded {} translations", mapping.len());

    let count = find_resource_files(input, ResourceKind::Text).len();
    if count == 0 {
        println!("No text files found in {}", input.display());
        return Ok(());
    }

    print_step(2, 2, GEAR, &format!("Translating {count} text files..."));
    let pb = simple_bar(count as u64, "Translating");
    let result = translate_text_dir(
        input,
        output,
        &mapping,
        options.decode,
        &options.encode_chain(),
        |progress| {
            pb.set_position(progress.current as u64);
            pb.set_message(progress.file.clone());
        },
    );
    pb.finish_and_clear();

    print_summary(&result.batch)?;
    let percent = if result.total > 0 { 100 * result.translated / result.total } else { 0 };
    println!("  Total messages: {}", result.total);
    println!("  Translated: {} ({percent}%)", result.translated);
    println!("  Output directory: {}", output.display());
    print_done(started.elapsed());
    Ok(())
}
