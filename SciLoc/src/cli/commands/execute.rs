//! Command execution implementations

use crate::config::CodecOptions;

use super::Commands;
use super::definitions::{BatchCommands, FontCommands, MsgCommands, TextCommands};
use super::{batch, font, msg, text};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, options: &CodecOptions) -> anyhow::Result<()> {
        match self {
            Commands::Font { command } => command.execute(options),
            Commands::Msg { command } => command.execute(options),
            Commands::Text { command } => command.execute(options),
            Commands::Batch { command } => command.execute(options),
        }
    }
}

impl FontCommands {
    /// Execute the selected font command.
    ///
    /// # Errors
    /// Returns an error if the font cannot be read, built or written.
    pub fn execute(&self, options: &CodecOptions) -> anyhow::Result<()> {
        match self {
            FontCommands::Export {
                font: path,
                output,
                quiet,
            } => font::export(path, output, *quiet),
            FontCommands::Build {
                input,
                output,
                line_height,
                reserved,
            } => font::build(
                input,
                output,
                line_height.unwrap_or(options.font.line_height),
                reserved.unwrap_or(options.font.reserved),
            ),
            FontCommands::Info { font: path } => font::info(path),
        }
    }
}

impl MsgCommands {
    /// Execute the selected message command.
    ///
    /// # Errors
    /// Returns an error if a resource or CSV file cannot be processed.
    pub fn execute(&self, options: &CodecOptions) -> anyhow::Result<()> {
        let mut options = options.msg;
        match self {
            MsgCommands::Export {
                msg: path,
                output,
                decode,
            } => {
                options.decode = decode.unwrap_or(options.decode);
                msg::export(path, output, &options)
            }
            MsgCommands::Build {
                csv,
                output,
                encode,
                last_id,
                no_verify,
            } => {
                options.encode = encode.unwrap_or(options.encode);
                msg::build(csv, output.as_deref(), &options, last_id.unwrap_or(0), !*no_verify)
            }
            MsgCommands::Verify {
                csv,
                msg: path,
                decode,
            } => {
                // Read back with the codepage the file was built with unless told otherwise
                options.decode = decode.unwrap_or(options.encode);
                msg::verify(csv, path, &options)
            }
            MsgCommands::Text { csv, output } => msg::text(csv, output),
            MsgCommands::Translate {
                csv,
                output,
                mapping,
            } => msg::translate(csv, output, mapping),
        }
    }
}

impl TextCommands {
    /// Execute the selected text resource command.
    ///
    /// # Errors
    /// Returns an error if a resource, TSV or mapping file cannot be processed.
    pub fn execute(&self, options: &CodecOptions) -> anyhow::Result<()> {
        let mut options = options.text;
        match self {
            TextCommands::Export {
                path,
                output,
                decode,
            } => text::export(path, output, decode.unwrap_or(options.decode)),
            TextCommands::Build {
                tsv,
                output,
                no_selector,
                encode,
            } => {
                options.encode = encode.unwrap_or(options.encode);
                text::build(tsv, output, &options, !*no_selector)
            }
            TextCommands::Translate {
                input,
                output,
                mapping,
                decode,
                encode,
            } => {
                options.decode = decode.unwrap_or(options.decode);
                options.encode = encode.unwrap_or(options.encode);
                text::translate(input, output, mapping, &options)
            }
        }
    }
}

impl BatchCommands {
    /// Execute the selected batch command.
    ///
    /// # Errors
    /// Returns an error if the source directory holds no matching files.
    pub fn execute(&self, options: &CodecOptions) -> anyhow::Result<()> {
        match self {
            BatchCommands::MsgExport {
                source,
                destination,
                decode,
            } => batch::msg_export(source, destination, decode.unwrap_or(options.msg.decode)),
            BatchCommands::TextExport {
                source,
                destination,
                decode,
            } => batch::text_export(source, destination, decode.unwrap_or(options.text.decode)),
        }
    }
}
