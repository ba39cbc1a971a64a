//! Codec options loaded from JSON
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "msg": { "decode": "cp862", "encode": "windows-1255" },
//!   "font": { "line_height": 10 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::common::{Codepage, FallbackChain};
use crate::formats::{font, msg, text};

/// Font build defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    /// Value written to the header's reserved field
    pub reserved: u32,
    pub line_height: u16,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            reserved: font::DEFAULT_RESERVED,
            line_height: font::DEFAULT_LINE_HEIGHT,
        }
    }
}

/// Message table defaults and codepages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsgOptions {
    pub res_type: u8,
    pub header_size: u8,
    pub sci_version: u32,
    /// Primary codepage when reading shipped resources
    pub decode: Codepage,
    /// Primary codepage when building resources
    pub encode: Codepage,
}

impl Default for MsgOptions {
    fn default() -> Self {
        Self {
            res_type: msg::DEFAULT_RES_TYPE,
            header_size: 0,
            sci_version: msg::DEFAULT_SCI_VERSION,
            decode: msg::SOURCE_CODEPAGE,
            encode: msg::DEFAULT_CODEPAGE,
        }
    }
}

impl MsgOptions {
    #[must_use]
    pub fn decode_chain(&self) -> FallbackChain {
        FallbackChain::with_primary(self.decode)
    }

    #[must_use]
    pub fn encode_chain(&self) -> FallbackChain {
        FallbackChain::with_primary(self.encode)
    }
}

/// Text resource codepages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Single codepage used to read text resources
    pub decode: Codepage,
    /// Primary codepage used to write text resources
    pub encode: Codepage,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            decode: text::SOURCE_CODEPAGE,
            encode: text::DEFAULT_CODEPAGE,
        }
    }
}

impl TextOptions {
    #[must_use]
    pub fn encode_chain(&self) -> FallbackChain {
        FallbackChain::with_primary(self.encode)
    }
}

/// All tunable codec settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub font: FontOptions,
    pub msg: MsgOptions,
    pub text: TextOptions,
}

impl CodecOptions {
    /// Load options from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json(&content)?;
        tracing::debug!("Loaded codec options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Parse options from a JSON string
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON for this structure.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize options as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load options from `path` if given, otherwise use the defaults
    ///
    /// # Errors
    /// Returns an error if the file is given but cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
