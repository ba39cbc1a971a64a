//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

use crate::formats::common::Codepage;

use super::parse_number;

/// Bitmap font commands
#[derive(Subcommand)]
pub enum FontCommands {
    /// Export every glyph of a font as `<index>.png`
    Export {
        /// Font file (e.g. font.000)
        font: PathBuf,

        /// Directory for the glyph images
        output: PathBuf,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build `font.<dirname>` from a directory of `<index>.png` glyphs
    Build {
        /// Glyph directory (e.g. fonts/001)
        input: PathBuf,

        /// Directory to write the font into
        output: PathBuf,

        /// Line height, decimal or 0x-prefixed hex (default from config: 12)
        #[arg(long, value_parser = parse_number::<u16>)]
        line_height: Option<u16>,

        /// Reserved header value (default from config: 0x87)
        #[arg(long, value_parser = parse_number::<u32>)]
        reserved: Option<u32>,
    },

    /// Show header fields and glyph statistics
    Info {
        /// Font file
        font: PathBuf,
    },
}

/// Message table commands
#[derive(Subcommand)]
pub enum MsgCommands {
    /// Export a message resource to `<stem>_messages.csv`
    Export {
        /// Message resource (e.g. 1000.msg)
        msg: PathBuf,

        /// Directory for the CSV file
        output: PathBuf,

        /// Primary decoding codepage (cp862, windows-1252, windows-1255, utf-8, latin-1)
        #[arg(long)]
        decode: Option<Codepage>,
    },

    /// Build a message resource from CSV and verify it
    Build {
        /// CSV file with the message records
        csv: PathBuf,

        /// Output file (default: `<csv stem>_new.msg` next to the CSV)
        output: Option<PathBuf>,

        /// Primary encoding codepage
        #[arg(long)]
        encode: Option<Codepage>,

        /// Value for the header's last id field
        #[arg(long, value_parser = parse_number::<u16>)]
        last_id: Option<u16>,

        /// Skip re-reading the built file
        #[arg(long)]
        no_verify: bool,
    },

    /// Compare a message resource against the CSV it was built from
    Verify {
        /// Source CSV file
        csv: PathBuf,

        /// Built message resource
        msg: PathBuf,

        /// Primary decoding codepage used to read the resource back
        #[arg(long)]
        decode: Option<Codepage>,
    },

    /// Write cleaned, sorted message texts to `<stem>_english.txt`
    Text {
        /// CSV file exported by `msg export`
        csv: PathBuf,

        /// Output directory
        output: PathBuf,
    },

    /// Replace message texts in a CSV using a mapping file
    Translate {
        /// CSV file exported by `msg export`
        csv: PathBuf,

        /// Output directory; the CSV keeps its file name
        output: PathBuf,

        /// Mapping file
        mapping: PathBuf,
    },
}

/// Text resource commands
#[derive(Subcommand)]
pub enum TextCommands {
    /// Export a text resource to `<module>.tsv`
    Export {
        /// Text resource (e.g. 100.tex)
        path: PathBuf,

        /// Directory for the TSV file
        output: PathBuf,

        /// Decoding codepage
        #[arg(long)]
        decode: Option<Codepage>,
    },

    /// Build `<module>.tex` and selector `<module+1>.tex` from `<module>.tsv`
    Build {
        /// TSV file named after its module number
        tsv: PathBuf,

        /// Output directory
        output: PathBuf,

        /// Do not write the selector file
        #[arg(long)]
        no_selector: bool,

        /// Primary encoding codepage
        #[arg(long)]
        encode: Option<Codepage>,
    },

    /// Apply a `source===translation` mapping to every text resource in a directory
    Translate {
        /// Directory containing `*.tex` / `text.*` files
        input: PathBuf,

        /// Directory for the translated files
        output: PathBuf,

        /// Mapping file
        mapping: PathBuf,

        /// Decoding codepage of the input files
        #[arg(long)]
        decode: Option<Codepage>,

        /// Primary encoding codepage of the output files
        #[arg(long)]
        encode: Option<Codepage>,
    },
}

/// Directory-wide commands
#[derive(Subcommand)]
pub enum BatchCommands {
    /// Export every `*.msg` under a directory to CSV
    MsgExport {
        /// Source directory
        source: PathBuf,

        /// Destination directory (source structure is preserved)
        destination: PathBuf,

        /// Primary decoding codepage
        #[arg(long)]
        decode: Option<Codepage>,
    },

    /// Export every text resource under a directory to TSV
    TextExport {
        /// Source directory
        source: PathBuf,

        /// Destination directory (source structure is preserved)
        destination: PathBuf,

        /// Decoding codepage
        #[arg(long)]
        decode: Option<Codepage>,
    },
}
