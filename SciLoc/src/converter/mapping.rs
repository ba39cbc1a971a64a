//! Translation mapping files
//!
//! A mapping file pairs source strings with translations, one per line:
//!
//! ```text
//! Open the door===פתח את הדלת
//! Two\nlines===שתי\nשורות
//! ```
//!
//! Both sides are trimmed; lines without `===` or with an empty side are
//! ignored. Line breaks in either side are written as a literal `\n`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::delimited::escape_newlines;
use super::messages_text::strip_stage_directions;
use super::msg_csv::{from_csv, to_csv};
use crate::batch::{BatchProgress, BatchResult, ResourceKind, batch_convert, find_resource_files};
use crate::error::{Error, Result};
use crate::formats::common::{Codepage, Diagnostic, FallbackChain};
use crate::formats::msg::MessageRecord;
use crate::formats::text::{TextResource, build_text_bytes_with, parse_text_bytes_with};

/// Separator between source and translation
pub const MAPPING_SEPARATOR: &str = "===";

/// Source → translation lookup table
#[derive(Debug, Clone, Default)]
pub struct TranslationMapping {
    entries: HashMap<String, String>,
}

impl TranslationMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse mapping file contents
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut mapping = Self::new();
        for line in input.lines() {
            let Some((source, target)) = line.split_once(MAPPING_SEPARATOR) else {
                continue;
            };
            mapping.insert(source, target);
        }
        mapping
    }

    /// Load a UTF-8 mapping file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mapping = Self::parse(&std::fs::read_to_string(path.as_ref())?);
        tracing::info!(
            "Loaded {} translations from {}",
            mapping.len(),
            path.as_ref().display()
        );
        Ok(mapping)
    }

    /// Add a pair; both sides are trimmed and empty sides are ignored
    pub fn insert(&mut self, source: &str, target: &str) {
        let (source, target) = (source.trim(), target.trim());
        if !source.is_empty() && !target.is_empty() {
            self.entries.insert(source.to_string(), target.to_string());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the translation of `message`
    ///
    /// Tried in order, first hit wins:
    /// 1. the message as is
    /// 2. the message with line breaks written as `\n`
    /// 3. the trimmed message
    /// 4. the trimmed message with line breaks written as `\n`
    /// 5. the message with all whitespace runs collapsed to one space
    ///
    /// Hits on the `\n` forms have `\n` in the translation turned back into
    /// line breaks.
    #[must_use]
    pub fn lookup(&self, message: &str) -> Option<String> {
        let literal = message.replace('\n', "\\n");

        if let Some(hit) = self.entries.get(message) {
            return Some(hit.clone());
        }
        if let Some(hit) = self.entries.get(&literal) {
            return Some(hit.replace("\\n", "\n"));
        }
        if let Some(hit) = self.entries.get(message.trim()) {
            return Some(hit.clone());
        }
        if let Some(hit) = self.entries.get(literal.trim()) {
            return Some(hit.replace("\\n", "\n"));
        }

        let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
        self.entries.get(&collapsed).cloned()
    }
}

/// Outcome of translating one text resource
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Translated strings; untranslated ones keep their source text
    pub resource: TextResource,
    pub total: usize,
    pub translated: usize,
}

/// Replace every string of `source` that has a mapping entry
#[must_use]
pub fn translate_text_resource(
    source: &TextResource,
    mapping: &TranslationMapping,
) -> TranslationResult {
    let mut translated = 0;
    let strings = source
        .strings
        .iter()
        .map(|message| {
            if let Some(hit) = mapping.lookup(message) {
                translated += 1;
                hit
            } else {
                message.clone()
            }
        })
        .collect();

    TranslationResult {
        resource: TextResource { strings },
        total: source.len(),
        translated,
    }
}

/// Translate one text resource file into `output_dir`, keeping its file name
///
/// # Errors
/// Returns an error if the file cannot be read or written.
pub fn translate_text_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    mapping: &TranslationMapping,
    decode: Codepage,
    encode: &FallbackChain,
) -> Result<(PathBuf, TranslationResult, Vec<Diagnostic>)> {
    let input = input.as_ref();
    let parsed = parse_text_bytes_with(&std::fs::read(input)?, decode)?;
    let result = translate_text_resource(&parsed.resource, mapping);
    let built = build_text_bytes_with(&result.resource, encode)?;

    std::fs::create_dir_all(output_dir.as_ref())?;
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::InvalidPath(input.to_path_buf()))?;
    let output = output_dir.as_ref().join(file_name);
    std::fs::write(&output, &built.bytes)?;

    tracing::debug!(
        "{}: {}/{} messages translated",
        input.display(),
        result.translated,
        result.total
    );

    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(built.diagnostics);
    Ok((output, result, diagnostics))
}

/// Outcome of translating a list of message records
#[derive(Debug, Clone)]
pub struct RecordTranslation {
    /// All records in input order; untranslated ones are unchanged
    pub records: Vec<MessageRecord>,
    pub total: usize,
    pub translated: usize,
}

/// Replace the text of every record that has a mapping entry
///
/// A record is looked up by its text with line breaks written as `\n` and
/// stage directions stripped, the same form the translator line export
/// produces. A hit replaces the whole text, with `\n` in the translation
/// turned back into line breaks. Every other field is kept.
#[must_use]
pub fn translate_records(
    records: &[MessageRecord],
    mapping: &TranslationMapping,
) -> RecordTranslation {
    let mut translated = 0;
    let records = records
        .iter()
        .map(|record| {
            let key = strip_stage_directions(&escape_newlines(&record.text));
            let mut record = record.clone();
            if let Some(hit) = mapping.lookup(&key) {
                record.text = hit.replace("\\n", "\n");
                translated += 1;
            }
            record
        })
        .collect::<Vec<_>>();

    RecordTranslation {
        total: records.len(),
        records,
        translated,
    }
}

/// Translate a message CSV into `<output_dir>/<csv file name>`
///
/// # Errors
/// Returns an error if the CSV is invalid or a file cannot be read or written.
pub fn translate_csv_file<P: AsRef<Path>, Q: AsRef<Path>>(
    csv_path: P,
    output_dir: Q,
    mapping: &TranslationMapping,
) -> Result<(PathBuf, RecordTranslation)> {
    let csv_path = csv_path.as_ref();
    let records = from_csv(&std::fs::read_to_string(csv_path)?)?;
    let result = translate_records(&records, mapping);

    std::fs::create_dir_all(output_dir.as_ref())?;
    let file_name = csv_path
        .file_name()
        .ok_or_else(|| Error::InvalidPath(csv_path.to_path_buf()))?;
    let output = output_dir.as_ref().join(file_name);
    std::fs::write(&output, to_csv(&result.records))?;

    tracing::info!(
        "{}: {}/{} messages translated",
        csv_path.display(),
        result.translated,
        result.total
    );
    Ok((output, result))
}

/// Outcome of translating a directory of text resources
#[derive(Debug, Default)]
pub struct DirTranslation {
    pub batch: BatchResult,
    /// Strings seen across every file that parsed
    pub total: usize,
    pub translated: usize,
}

/// Translate every text resource under `input_dir` into `output_dir`
///
/// Files are processed with [`batch_convert`]: a file that fails to parse
/// or write is recorded in [`DirTranslation::batch`] and the rest are still
/// translated. Relative subdirectories are kept.
pub fn translate_text_dir<F>(
    input_dir: &Path,
    output_dir: &Path,
    mapping: &TranslationMapping,
    decode: Codepage,
    encode: &FallbackChain,
    progress: F,
) -> DirTranslation
where
    F: Fn(&BatchProgress) + Send + Sync,
{
    let files = find_resource_files(input_dir, ResourceKind::Text);
    let total = AtomicUsize::new(0);
    let translated = AtomicUsize::new(0);

    let batch = batch_convert(
        &files,
        input_dir,
        output_dir,
        |path, out_dir| {
            let (_, result, diagnostics) =
                translate_text_file(path, out_dir, mapping, decode, encode)?;
            total.fetch_add(result.total, Ordering::SeqCst);
            translated.fetch_add(result.translated, Ordering::SeqCst);
            Ok(format!(
                "{}/{} translated, {} warnings",
                result.translated,
                result.total,
                diagnostics.len()
            ))
        },
        progress,
    );

    DirTranslation {
        batch,
        total: total.load(Ordering::SeqCst),
        translated: translated.load(Ordering::SeqCst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping() -> TranslationMapping {
        TranslationMapping::parse(
            "Open the door===פתח את הדלת\n\
             Two\\nlines===שתי\\nשורות\n\
             no separator here\n\
             ===empty source\n\
             Take it=== \n\
             Look around === הבט סביב\n",
        )
    }

    #[test]
    fn test_parse_skips_bad_lines() {
        let m = mapping();
        assert_eq!(m.len(), 3);
        assert_eq!(m.lookup("Look around").as_deref(), Some("הבט סביב"));
        assert_eq!(m.lookup("Take it"), None);
    }

    #[test]
    fn test_lookup_strategies() {
        let m = mapping();
        // exact
        assert_eq!(m.lookup("Open the door").as_deref(), Some("פתח את הדלת"));
        // real line break matches the literal form and is restored
        assert_eq!(m.lookup("Two\nlines").as_deref(), Some("שתי\nשורות"));
        // trimmed
        assert_eq!(m.lookup("  Open the door ").as_deref(), Some("פתח את הדלת"));
        // trimmed literal
        assert_eq!(m.lookup(" Two\nlines  ").as_deref(), Some("שתי\nשורות"));
        // collapsed whitespace
        assert_eq!(m.lookup("Open   the\tdoor").as_deref(), Some("פתח את הדלת"));
        assert_eq!(m.lookup("Close the door"), None);
    }

    #[test]
    fn test_translate_resource_counts() {
        let source = TextResource::from_strings(["Open the door", "Unknown", ""]);
        let result = translate_text_resource(&source, &mapping());
        assert_eq!(result.total, 3);
        assert_eq!(result.translated, 1);
        assert_eq!(result.resource.strings, vec!["פתח את הדלת", "Unknown", ""]);
    }

    #[test]
    fn test_translate_file() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("text.001");
        std::fs::write(&input, b"\x83\x00Open the door\x00Keep\x00").unwrap();

        let (output, result, diagnostics) = translate_text_file(
            &input,
            temp.path().join("out"),
            &mapping(),
            Codepage::Windows1252,
            &FallbackChain::with_primary(Codepage::Windows1255),
        )
        .unwrap();

        assert_eq!(result.translated, 1);
        assert!(diagnostics.is_empty());
        assert!(output.ends_with("out/text.001"));
        let bytes = std::fs::read(output).unwrap();
        assert_eq!(&bytes[..3], &[0x83, 0x00, 0xF4]);
        assert!(bytes.ends_with(b"Keep\x00"));
    }

    #[test]
    fn test_translate_dir_continues_past_bad_file() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        // Too short to hold the magic
        std::fs::write(input.join("text.001"), [0x83]).unwrap();
        std::fs::write(input.join("text.002"), b"\x83\x00Open the door\x00Hello\x00").unwrap();

        let result = translate_text_dir(
            &input,
            &output,
            &mapping(),
            Codepage::Windows1252,
            &FallbackChain::with_primary(Codepage::Windows1255),
            |_| {},
        );

        assert_eq!(result.batch.success_count, 1);
        assert_eq!(result.batch.fail_count, 1);
        assert_eq!((result.total, result.translated), (2, 1));
        assert!(!output.join("text.001").exists());
        let bytes = std::fs::read(output.join("text.002")).unwrap();
        assert!(bytes.ends_with(b"Hello\x00"));
    }

    #[test]
    fn test_translate_records_cleans_keys() {
        let mut talker = MessageRecord::new(2, 1, 0, 1, "(LAUGHS)Open the door");
        talker.talker = 99;
        let records = vec![
            talker,
            MessageRecord::new(2, 1, 0, 2, "Two\nlines"),
            MessageRecord::new(2, 1, 0, 3, "Not mapped"),
            MessageRecord::new(2, 1, 0, 4, ""),
        ];

        let result = translate_records(&records, &mapping());
        assert_eq!((result.total, result.translated), (4, 2));
        assert_eq!(result.records[0].text, "פתח את הדלת");
        assert_eq!(result.records[0].talker, 99);
        assert_eq!(result.records[1].text, "שתי\nשורות");
        assert_eq!(result.records[2], records[2]);
        assert_eq!(result.records[3], records[3]);
    }

    #[test]
    fn test_translate_csv_file() {
        let temp = tempfile::tempdir().unwrap();
        let csv_path = temp.path().join("100_messages.csv");
        let records = vec![
            MessageRecord::new(1, 0, 0, 1, "\" Look around\""),
            MessageRecord::new(1, 0, 0, 2, "Open the door"),
        ];
        std::fs::write(&csv_path, to_csv(&records)).unwrap();

        let (output, result) =
            translate_csv_file(&csv_path, temp.path().join("out"), &mapping()).unwrap();
        assert_eq!(output, temp.path().join("out").join("100_messages.csv"));
        assert_eq!(result.translated, 1);

        let written = from_csv(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written[0].text, "\" Look around\"");
        assert_eq!(written[1].text, "פתח את הדלת");
    }
}
