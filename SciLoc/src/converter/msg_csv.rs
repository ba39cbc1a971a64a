//! Message table ↔ CSV conversion
//!
//! # CSV Format
//!
//! One row per record, in on-disk order, UTF-8:
//!
//! ```csv
//! noun,verb,case,sequence,talker,text_offset,ref_noun,ref_verb,ref_case,ref_sequence,text
//! 3,1,0,1,99,140,0,0,0,0,It's a sturdy oak door.
//! ```
//!
//! `text_offset` is informational; building always recomputes it.

use std::path::{Path, PathBuf};

use super::delimited::{join_record, parse_records};
use crate::error::{Error, Result};
use crate::formats::common::{Diagnostic, FallbackChain};
use crate::formats::msg::{
    MessageRecord, MessageTable, build_msg_bytes_with, parse_msg_bytes_with,
};

/// Column order of exported CSV files
pub const CSV_COLUMNS: [&str; 11] = [
    "noun",
    "verb",
    "case",
    "sequence",
    "talker",
    "text_offset",
    "ref_noun",
    "ref_verb",
    "ref_case",
    "ref_sequence",
    "text",
];

/// Render message records as CSV, header row included
#[must_use]
pub fn to_csv(records: &[MessageRecord]) -> String {
    let mut output = CSV_COLUMNS.join(",");
    output.push('\n');

    for r in records {
        let fields = [
            r.noun.to_string(),
            r.verb.to_string(),
            r.case.to_string(),
            r.sequence.to_string(),
            r.talker.to_string(),
            r.text_offset.to_string(),
            r.ref_noun.to_string(),
            r.ref_verb.to_string(),
            r.ref_case.to_string(),
            r.ref_sequence.to_string(),
            r.text.clone(),
        ];
        output.push_str(&join_record(&fields, ','));
        output.push('\n');
    }

    output
}

/// Parse CSV rows back into message records
///
/// Columns are matched by header name, so their order may differ from
/// [`CSV_COLUMNS`]; `text_offset` is optional.
///
/// # Errors
/// Returns [`Error::InvalidRow`] if a required column is missing or a
/// numeric field is not a byte value.
pub fn from_csv(input: &str) -> Result<Vec<MessageRecord>> {
    let mut records = parse_records(input, ',')?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| header.fields.iter().position(|h| h.trim() == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| Error::InvalidRow {
            line: header.line,
            message: format!("missing column '{name}'"),
        })
    };

    let noun = required("noun")?;
    let verb = required("verb")?;
    let case = required("case")?;
    let sequence = required("sequence")?;
    let talker = required("talker")?;
    let text_offset = column("text_offset");
    let ref_noun = required("ref_noun")?;
    let ref_verb = required("ref_verb")?;
    let ref_case = required("ref_case")?;
    let ref_sequence = required("ref_sequence")?;
    let text = required("text")?;

    records
        .map(|row| -> Result<MessageRecord> {
            let get = |i: usize| row.fields.get(i).map_or("", String::as_str);
            let byte = |i: usize| {
                get(i).trim().parse::<u8>().map_err(|_| Error::InvalidRow {
                    line: row.line,
                    message: format!("'{}' is not a value in 0..=255 ({})", get(i), header.fields[i]),
                })
            };

            Ok(MessageRecord {
                noun: byte(noun)?,
                verb: byte(verb)?,
                case: byte(case)?,
                sequence: byte(sequence)?,
                talker: byte(talker)?,
                text_offset: text_offset
                    .and_then(|i| get(i).trim().parse().ok())
                    .unwrap_or_default(),
                ref_noun: byte(ref_noun)?,
                ref_verb: byte(ref_verb)?,
                ref_case: byte(ref_case)?,
                ref_sequence: byte(ref_sequence)?,
                text: get(text).to_string(),
            })
        })
        .collect()
}

/// Default CSV path for a message resource: `<output_dir>/<stem>_messages.csv`
#[must_use]
pub fn csv_path_for(msg_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = msg_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}_messages.csv"))
}

/// Export a message resource to `<output_dir>/<stem>_messages.csv`
///
/// Returns the CSV path and the number of records written.
///
/// # Errors
/// Returns an error if the resource cannot be parsed or the CSV cannot be written.
pub fn convert_msg_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    msg_path: P,
    output_dir: Q,
    chain: &FallbackChain,
) -> Result<(PathBuf, usize)> {
    let msg_path = msg_path.as_ref();
    let data = std::fs::read(msg_path)?;
    let parsed = parse_msg_bytes_with(&data, chain)?;

    std::fs::create_dir_all(output_dir.as_ref())?;
    let csv_path = csv_path_for(msg_path, output_dir.as_ref());
    std::fs::write(&csv_path, to_csv(&parsed.table.records))?;

    tracing::info!(
        "Exported {} messages from {} to {}",
        parsed.table.len(),
        msg_path.display(),
        csv_path.display()
    );
    Ok((csv_path, parsed.table.len()))
}

/// Build a message resource from CSV rows
///
/// `template` supplies the header fields (`res_type`, `header_size`,
/// `sci_version`, `last_id`); its records are replaced.
///
/// # Errors
/// Returns an error if the CSV is invalid, the table is too large or the
/// file cannot be written.
pub fn convert_csv_to_msg<P: AsRef<Path>, Q: AsRef<Path>>(
    csv_path: P,
    msg_path: Q,
    template: &MessageTable,
    chain: &FallbackChain,
) -> Result<MessageTable> {
    let input = std::fs::read_to_string(csv_path.as_ref())?;
    let mut table = template.clone();
    table.records = from_csv(&input)?;
    table.refresh_offsets(chain)?;

    let bytes = build_msg_bytes_with(&table, chain)?;
    std::fs::write(msg_path.as_ref(), &bytes)?;

    tracing::info!(
        "Created {} with {} messages ({} bytes)",
        msg_path.as_ref().display(),
        table.len(),
        bytes.len()
    );
    Ok(table)
}

/// Outcome of comparing a built message table against its source rows
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    /// Number of record pairs compared
    pub compared: usize,
    /// Record count mismatch, if any
    pub diagnostics: Vec<Diagnostic>,
    /// One line per differing text or field
    pub mismatches: Vec<String>,
}

impl VerifyReport {
    /// Whether the tables agree
    #[must_use]
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty() && self.mismatches.is_empty()
    }
}

/// Compare parsed records against the records they were built from
///
/// Texts are compared after trimming surrounding whitespace; the category
/// fields (`noun`, `verb`, `case`, `sequence`, `talker`) must match exactly.
/// When the counts differ an [`Diagnostic::InconsistentRecordCount`] is
/// reported and the overlapping prefix is still compared.
#[must_use]
pub fn verify_msg_against_records(
    expected: &[MessageRecord],
    parsed: &[MessageRecord],
) -> VerifyReport {
    let mut report = VerifyReport::default();

    if expected.len() != parsed.len() {
        tracing::warn!(
            "Message count mismatch: expected {}, parsed {}",
            expected.len(),
            parsed.len()
        );
        report.diagnostics.push(Diagnostic::InconsistentRecordCount {
            expected: expected.len(),
            found: parsed.len(),
        });
    }

    for (i, (want, got)) in expected.iter().zip(parsed).enumerate() {
        report.compared += 1;
        if want.text.trim() != got.text.trim() {
            report.mismatches.push(format!(
                "message {}: text '{}' vs '{}'",
                i + 1,
                want.text,
                got.text
            ));
        }

        let fields = [
            ("noun", want.noun, got.noun),
            ("verb", want.verb, got.verb),
            ("case", want.case, got.case),
            ("sequence", want.sequence, got.sequence),
            ("talker", want.talker, got.talker),
        ];
        for (name, a, b) in fields {
            if a != b {
                report
                    .mismatches
                    .push(format!("message {}: {name} {a} vs {b}", i + 1));
            }
        }
    }

    report
}

/// Parse a built message resource and compare it against its CSV source
///
/// # Errors
/// Returns an error if either file cannot be read or parsed.
pub fn verify_msg_file<P: AsRef<Path>, Q: AsRef<Path>>(
    csv_path: P,
    msg_path: Q,
    chain: &FallbackChain,
) -> Result<VerifyReport> {
    let expected = from_csv(&std::fs::read_to_string(csv_path.as_ref())?)?;
    let data = std::fs::read(msg_path.as_ref())?;
    let parsed = parse_msg_bytes_with(&data, chain)?;
    Ok(verify_msg_against_records(&expected, &parsed.table.records))
}
