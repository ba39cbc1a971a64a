//! Plain-text export of message texts for translators
//!
//! Texts are listed in `(noun, verb, case, sequence)` order, one per line,
//! with parenthesised stage directions removed and line breaks written as
//! a literal `\n`. Texts left empty after cleaning are dropped.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::delimited::escape_newlines;
use super::msg_csv::from_csv;
use crate::error::Result;
use crate::formats::msg::MessageRecord;

// Stage directions such as "(LAUGHS)" or "([0]pause)"
static STAGE_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

static QUOTE_PADDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"\s+"#).expect("valid regex"));

/// Remove stage directions, the space after an opening quote, and surrounding whitespace
#[must_use]
pub fn strip_stage_directions(text: &str) -> String {
    let cleaned = STAGE_DIRECTION.replace_all(text, "");
    let cleaned = QUOTE_PADDING.replace(&cleaned, "\"");
    cleaned.trim().to_string()
}

/// Cleaned, sorted message lines
#[must_use]
pub fn messages_to_lines(records: &[MessageRecord]) -> Vec<String> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by_key(|r| r.key());

    sorted
        .into_iter()
        .map(|r| strip_stage_directions(&r.text))
        .filter(|text| !text.is_empty())
        .map(|text| escape_newlines(&text))
        .collect()
}

/// Output path for a message CSV: `<output_dir>/<csv stem>_english.txt`
#[must_use]
pub fn text_path_for(csv_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}_english.txt"))
}

/// Write the cleaned texts of a message CSV to `<output_dir>/<stem>_english.txt`
///
/// Returns the output path and the number of lines written.
///
/// # Errors
/// Returns an error if the CSV is invalid or a file cannot be read or written.
pub fn convert_csv_to_text_lines<P: AsRef<Path>, Q: AsRef<Path>>(
    csv_path: P,
    output_dir: Q,
) -> Result<(PathBuf, usize)> {
    let records = from_csv(&std::fs::read_to_string(csv_path.as_ref())?)?;
    let lines = messages_to_lines(&records);

    std::fs::create_dir_all(output_dir.as_ref())?;
    let output = text_path_for(csv_path.as_ref(), output_dir.as_ref());
    let mut content = lines.join("\n");
    if !lines.is_empty() {
        content.push('\n');
    }
    std::fs::write(&output, content)?;

    tracing::info!(
        "Processed {} messages, wrote {} lines to {}",
        records.len(),
        lines.len(),
        output.display()
    );
    Ok((output, lines.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_stage_directions() {
        assert_eq!(strip_stage_directions("(LAUGHS) Very funny."), "Very funny.");
        assert_eq!(strip_stage_directions("\"  (sad)Hello\" "), "\"Hello\"");
        assert_eq!(strip_stage_directions("([0]pause)"), "");
        assert_eq!(strip_stage_directions("no directions"), "no directions");
    }

    #[test]
    fn test_lines_sorted_and_cleaned() {
        let records = vec![
            MessageRecord::new(2, 0, 0, 1, "Second noun"),
            MessageRecord::new(1, 1, 0, 2, "Line\nbreak"),
            MessageRecord::new(1, 1, 0, 1, "(SIGH)"),
            MessageRecord::new(1, 0, 0, 1, "First"),
        ];
        assert_eq!(
            messages_to_lines(&records),
            vec!["First", "Line\\nbreak", "Second noun"]
        );
    }

    #[test]
    fn test_text_path_for() {
        assert_eq!(
            text_path_for(Path::new("out/1000_messages.csv"), Path::new("txt")),
            PathBuf::from("txt/1000_messages_english.txt")
        );
    }
}
