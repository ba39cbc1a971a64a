//! Text resource ↔ TSV conversion
//!
//! # TSV Format
//!
//! ```tsv
//! Index\tNoun\tSelector\tVerb\tText\tOriginal
//! 0\t\t\t\tOpen the door\t
//! ```
//!
//! Line breaks and tabs inside a string are written as a literal `\n` and
//! `\t`. A `text.NNN` resource exports to `NNN.tsv`. When reading
//! back, any line whose first field is not a number (such as the header) is
//! skipped, and field 4 (`Text`) becomes the text resource while field 2
//! (`Selector`) becomes the selector side-table `<module+1>.tex`.

use std::path::{Path, PathBuf};

use super::delimited::{escape_newlines, unescape_newlines};
use crate::error::{Error, Result};
use crate::formats::common::{Codepage, Diagnostic, FallbackChain};
use crate::formats::text::{TextResource, build_text_bytes_with, parse_text_bytes_with};

/// Header row of exported TSV files
pub const TSV_HEADER: &str = "Index\tNoun\tSelector\tVerb\tText\tOriginal";

/// Column holding selector names
pub const SELECTOR_FIELD: usize = 2;

/// Column holding the (translated) text
pub const TEXT_FIELD: usize = 4;

/// Render a text resource as TSV, header row included
#[must_use]
pub fn to_tsv(resource: &TextResource) -> String {
    let mut output = String::from(TSV_HEADER);
    output.push('\n');
    for (i, text) in resource.strings.iter().enumerate() {
        // Noun, Selector, Verb and Original start empty
        output.push_str(&format!("{i}\t\t\t\t{}\t\n", escape_field(text)));
    }
    output
}

/// Collect one field of every data row into a text resource
///
/// A row missing the field contributes an empty string, so positions stay
/// aligned with the row order.
#[must_use]
pub fn from_tsv_field(input: &str, field: usize) -> TextResource {
    let strings = input
        .lines()
        .map(|line| line.trim_end_matches('\r').split('\t').collect::<Vec<_>>())
        .filter(|fields| is_numeric(fields[0]))
        .map(|fields| fields.get(field).map_or_else(String::new, |f| unescape_field(f)))
        .collect::<Vec<_>>();
    TextResource { strings }
}

fn escape_field(text: &str) -> String {
    escape_newlines(text).replace('\t', "\\t")
}

fn unescape_field(field: &str) -> String {
    unescape_newlines(field).replace("\\t", "\t")
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Module name of a text resource: `NNN` for `text.NNN`, the file stem otherwise
#[must_use]
pub fn module_name(text_path: &Path) -> String {
    let file_name = text_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("text.") && file_name.len() > 5 => {
            file_name[5..].to_string()
        }
        _ => text_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Path of the TSV written for a text resource: `<output_dir>/<module>.tsv`
#[must_use]
pub fn tsv_path_for(text_path: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.tsv", module_name(text_path)))
}

/// Export a text resource to `<output_dir>/<module>.tsv`
///
/// Returns the TSV path, the number of strings and the decode diagnostics.
///
/// # Errors
/// Returns an error if the resource cannot be read or the TSV cannot be written.
pub fn convert_text_to_tsv<P: AsRef<Path>, Q: AsRef<Path>>(
    text_path: P,
    output_dir: Q,
    codepage: Codepage,
) -> Result<(PathBuf, usize, Vec<Diagnostic>)> {
    let text_path = text_path.as_ref();
    let data = std::fs::read(text_path)?;
    let parsed = parse_text_bytes_with(&data, codepage)?;

    std::fs::create_dir_all(output_dir.as_ref())?;
    let tsv_path = tsv_path_for(text_path, output_dir.as_ref());
    std::fs::write(&tsv_path, to_tsv(&parsed.resource))?;

    tracing::info!(
        "Converted {} entries from {} to {}",
        parsed.resource.len(),
        text_path.display(),
        tsv_path.display()
    );
    Ok((tsv_path, parsed.resource.len(), parsed.diagnostics))
}

/// Files written by [`convert_tsv_to_text`]
#[derive(Debug, Clone)]
pub struct TsvBuildResult {
    /// `<module>.tex`
    pub text_path: PathBuf,
    /// `<module+1>.tex`, unless selectors were disabled
    pub selector_path: Option<PathBuf>,
    /// Number of data rows
    pub entries: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build `<module>.tex` (and the selector `<module+1>.tex`) from `<module>.tsv`
///
/// The module keeps the stem's zero padding, so `001.tsv` builds `001.tex`
/// and `002.tex`.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the TSV stem is not a module number in
/// `0..=65535`, or its selector number would not be, or an I/O error if a
/// file cannot be read or written.
pub fn convert_tsv_to_text<P: AsRef<Path>, Q: AsRef<Path>>(
    tsv_path: P,
    output_dir: Q,
    chain: &FallbackChain,
    with_selector: bool,
) -> Result<TsvBuildResult> {
    let tsv_path = tsv_path.as_ref();
    let invalid = || Error::InvalidPath(tsv_path.to_path_buf());
    let stem = tsv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| is_numeric(s))
        .ok_or_else(invalid)?;
    let module: u16 = stem.parse().map_err(|_| invalid())?;
    let selector_module = if with_selector {
        Some(module.checked_add(1).ok_or_else(invalid)?)
    } else {
        None
    };

    let input = std::fs::read_to_string(tsv_path)?;
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let texts = from_tsv_field(&input, TEXT_FIELD);
    let text_path = output_dir.join(format!("{stem}.tex"));
    let built = build_text_bytes_with(&texts, chain)?;
    std::fs::write(&text_path, &built.bytes)?;
    let mut diagnostics = built.diagnostics;
    tracing::info!(
        "Converted {} entries from {} field {TEXT_FIELD} to {}",
        texts.len(),
        tsv_path.display(),
        text_path.display()
    );

    let selector_path = if let Some(selector_module) = selector_module {
        let selectors = from_tsv_field(&input, SELECTOR_FIELD);
        let path = output_dir.join(format!("{selector_module:0width$}.tex", width = stem.len()));
        let built = build_text_bytes_with(&selectors, chain)?;
        std::fs::write(&path, &built.bytes)?;
        diagnostics.extend(built.diagnostics);
        Some(path)
    } else {
        tracing::debug!("Skipping selector file for module {stem}");
        None
    };

    Ok(TsvBuildResult {
        text_path,
        selector_path,
        entries: texts.len(),
        diagnostics,
    })
}
