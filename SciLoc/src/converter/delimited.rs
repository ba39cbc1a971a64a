//! Minimal CSV/TSV field handling
//!
//! Writing quotes a field only when it contains the delimiter, a quote or a
//! line break. Reading follows RFC 4180: quoted fields may span lines and
//! `""` inside quotes is a literal quote.

use crate::error::{Error, Result};

/// Escape text for delimited output
pub(crate) fn escape_for_delimited(text: &str, delimiter: char) -> String {
    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') || text.contains('"')
    {
        let escaped = text.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        text.to_string()
    }
}

/// Join fields into one delimited line (without terminator)
pub(crate) fn join_record<S: AsRef<str>>(fields: &[S], delimiter: char) -> String {
    fields
        .iter()
        .map(|f| escape_for_delimited(f.as_ref(), delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// One parsed record and the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split delimited input into records
///
/// Blank lines are skipped. A leading UTF-8 BOM is ignored.
///
/// # Errors
/// Returns [`Error::InvalidRow`] if a quoted field is never closed.
pub(crate) fn parse_records(input: &str, delimiter: char) -> Result<Vec<Record>> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                finish_record(&mut records, &mut fields, record_line);
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::InvalidRow {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        finish_record(&mut records, &mut fields, record_line);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<Record>, fields: &mut Vec<String>, line: usize) {
    let fields = std::mem::take(fields);
    if fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    records.push(Record { line, fields });
}

/// Replace line breaks with a literal `\n`
pub(crate) fn escape_newlines(text: &str) -> String {
    text.replace("\r\n", "\\n").replace('\n', "\\n")
}

/// Turn every literal `\n` back into a line break
pub(crate) fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
