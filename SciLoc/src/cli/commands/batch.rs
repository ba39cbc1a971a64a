//! CLI commands for directory-wide conversions

use std::path::Path;

use crate::batch::{BatchResult, ResourceKind, batch_convert, find_resource_files};
use crate::cli::progress::{TRUCK, print_step, simple_bar};
use crate::converter::msg_csv::convert_msg_to_csv;
use crate::converter::text_tsv::convert_text_to_tsv;
use crate::formats::common::{Codepage, FallbackChain};

/// Export every message resource under `source` to CSV
pub fn msg_export(source: &Path, dest: &Path, decode: Codepage) -> anyhow::Result<()> {
    let files = find_resource_files(source, ResourceKind::Message);
    if files.is_empty() {
        println!("No message files found in: {}", source.display());
        return Ok(());
    }

    print_step(1, 1, TRUCK, &format!("Exporting {} message files...", files.len()));
    let chain = FallbackChain::with_primary(decode);
    let pb = simple_bar(files.len() as u64, "Exporting");

    let result = batch_convert(
        &files,
        source,
        dest,
        |path, out_dir| {
            let (_, count) = convert_msg_to_csv(path, out_dir, &chain)?;
            Ok(format!("{count} messages"))
        },
        |progress| {
            pb.set_position(progress.current as u64);
            pb.set_message(progress.file.clone());
        },
    );
    pb.finish_and_clear();

    print_summary(&result)
}

/// Export every text resource under `source` to TSV
pub fn text_export(source: &Path, dest: &Path, decode: Codepage) -> anyhow::Result<()> {
    let files = find_resource_files(source, ResourceKind::Text);
    if files.is_empty() {
        println!("No text files found in: {}", source.display());
        return Ok(());
    }

    print_step(1, 1, TRUCK, &format!("Exporting {} text files...", files.len()));
    let pb = simple_bar(files.len() as u64, "Exporting");

    let result = batch_convert(
        &files,
        source,
        dest,
        |path, out_dir| {
            let (_, count, diagnostics) = convert_text_to_tsv(path, out_dir, decode)?;
            Ok(format!("{count} entries, {} warnings", diagnostics.len()))
        },
        |progress| {
            pb.set_position(progress.current as u64);
            pb.set_message(progress.file.clone());
        },
    );
    pb.finish_and_clear();

    print_summary(&result)
}

pub(crate) fn print_summary(result: &BatchResult) -> anyhow::Result<()> {
    println!();
    println!("Conversion complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for line in result.results.iter().filter(|r| r.starts_with("Failed")) {
            println!("  {line}");
        }
    }
    Ok(())
}
