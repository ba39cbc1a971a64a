//! CLI commands for message tables

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step, print_warning};
use crate::config::MsgOptions;
use crate::converter::mapping::{TranslationMapping, translate_csv_file};
use crate::converter::messages_text::convert_csv_to_text_lines;
use crate::converter::msg_csv::{
    VerifyReport, convert_csv_to_msg, convert_msg_to_csv, verify_msg_file,
};
use crate::formats::msg::MessageTable;

/// Export a message resource to CSV
pub fn export(msg_path: &Path, output: &Path, options: &MsgOptions) -> anyhow::Result<()> {
    let (csv_path, count) = convert_msg_to_csv(msg_path, output, &options.decode_chain())?;
    println!("Exported {count} messages to {}", csv_path.display());
    Ok(())
}

/// Build a message resource from CSV, then read it back and compare
pub fn build(
    csv_path: &Path,
    output: Option<&Path>,
    options: &MsgOptions,
    last_id: u16,
    verify_after: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let output = output.map_or_else(|| default_output(csv_path), Path::to_path_buf);
    let steps = if verify_after { 2 } else { 1 };

    print_step(1, steps, DISK, &format!("Creating {}...", output.display()));
    let template = MessageTable {
        res_type: options.res_type,
        header_size: options.header_size,
        sci_version: options.sci_version,
        last_id,
        records: Vec::new(),
    };
    let chain = options.encode_chain();
    let table = convert_csv_to_msg(csv_path, &output, &template, &chain)?;
    println!("  Messages: {}", table.len());
    println!("  File size: {} bytes", std::fs::metadata(&output)?.len());

    if verify_after {
        print_step(2, steps, LOOKING_GLASS, "Verifying...");
        let report = verify_msg_file(csv_path, &output, &chain)?;
        print_report(&report);
        if !report.passed() {
            anyhow::bail!("Verification failed for {}", output.display());
        }
    }

    print_done(started.elapsed());
    Ok(())
}

/// `<csv stem>_new.msg` next to the CSV
fn default_output(csv_path: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    csv_path.with_file_name(format!("{stem}_new.msg"))
}

/// Compare a built resource against its CSV source
pub fn verify(csv_path: &Path, msg_path: &Path, options: &MsgOptions) -> anyhow::Result<()> {
    print_step(1, 1, GEAR, &format!("Comparing {}...", msg_path.display()));
    let report = verify_msg_file(csv_path, msg_path, &options.decode_chain())?;
    print_report(&report);
    if !report.passed() {
        anyhow::bail!("Verification failed for {}", msg_path.display());
    }
    Ok(())
}

fn print_report(report: &VerifyReport) {
    for diagnostic in &report.diagnostics {
        print_warning(&diagnostic.to_string());
    }
    for mismatch in report.mismatches.iter().take(20) {
        print_warning(mismatch);
    }
    if report.mismatches.len() > 20 {
        println!("  ... and {} more", report.mismatches.len() - 20);
    }
    if report.passed() {
        println!("Verification passed: all {} messages match", report.compared);
    } else {
        println!(
            "Verification failed: {} problems found",
            report.diagnostics.len() + report.mismatches.len()
        );
    }
}

/// Export cleaned message texts for translators
pub fn text(csv_path: &Path, output: &Path) -> anyhow::Result<()> {
    let (path, lines) = convert_csv_to_text_lines(csv_path, output)?;
    println!("Wrote {lines} lines to {}", path.display());
    Ok(())
}

/// Translate the texts of a message CSV
pub fn translate(csv_path: &Path, output: &Path, mapping_path: &Path) -> anyhow::Result<()> {
    let mapping = TranslationMapping::load(mapping_path)?;
    println!("Loaded {} translations", mapping.len());

    let (path, result) = translate_csv_file(csv_path, output, &mapping)?;
    println!(
        "Replaced {} of {} messages, written to {}",
        result.translated,
        result.total,
        path.display()
    );
    Ok(())
}
