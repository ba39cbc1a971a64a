use clap::Subcommand;
use std::num::ParseIntError;
use std::str::FromStr;

pub mod batch;
pub mod definitions;
pub mod execute;
pub mod font;
pub mod msg;
pub mod text;

use definitions::{BatchCommands, FontCommands, MsgCommands, TextCommands};

/// Parse a decimal or `0x`-prefixed hexadecimal integer
pub(crate) fn parse_number<T>(s: &str) -> Result<T, String>
where
    T: FromStr<Err = ParseIntError> + TryFrom<u64>,
{
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| e.to_string())
            .and_then(|v| T::try_from(v).map_err(|_| format!("'{s}' is out of range")))
    } else {
        s.parse::<T>().map_err(|e| e.to_string())
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bitmap font operations
    Font {
        #[command(subcommand)]
        command: FontCommands,
    },

    /// Message table operations
    Msg {
        #[command(subcommand)]
        command: MsgCommands,
    },

    /// Text resource operations
    Text {
        #[command(subcommand)]
        command: TextCommands,
    },

    /// Directory-wide conversions
    Batch {
        #[command(subcommand)]
        command: BatchCommands,
    },
}
