//! Conversions between SCI resources and editable files
//!
//! - Font ↔ directory of `<index>.png` glyph images
//! - Message table ↔ CSV, plus a sorted plain-text export for translators
//! - Text resource ↔ TSV (with selector side-table)
//! - Text resource or message CSV + `===` mapping file → translated copy

mod delimited;
pub mod font_png;
pub mod mapping;
pub mod messages_text;
pub mod msg_csv;
pub mod text_tsv;

/// Progress callback type for conversion operations.
/// The callback receives a message describing the current step.
pub type ProgressCallback<'a> = &'a dyn Fn(&str);

// Font exports
pub use font_png::{
    convert_font_to_png_dir, convert_font_to_png_dir_with_progress, convert_png_dir_to_font,
    export_font_to_png_dir, load_png_dir,
};

// Message exports
pub use msg_csv::{
    VerifyReport, convert_csv_to_msg, convert_msg_to_csv, from_csv, to_csv,
    verify_msg_against_records, verify_msg_file,
};
pub use messages_text::{convert_csv_to_text_lines, messages_to_lines, strip_stage_directions};

// Text resource exports
pub use text_tsv::{TsvBuildResult, convert_text_to_tsv, convert_tsv_to_text, from_tsv_field, to_tsv};
pub use mapping::{
    DirTranslation, RecordTranslation, TranslationMapping, TranslationResult, translate_csv_file,
    translate_records, translate_text_dir, translate_text_file, translate_text_resource,
};
