//! 8-bit codepages and fallback chains for game text
//!
//! Game texts are stored in single-byte codepages: DOS Hebrew (CP862) in
//! older message resources, Windows-1252 for English text resources and
//! Windows-1255 for translated output. A [`FallbackChain`] tries codepages in
//! order; the first one that succeeds wins. Latin-1 maps every byte value and
//! UTF-8 can encode every `char`, so chains ending in those never fail.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, WINDOWS_1252, WINDOWS_1255};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A text encoding used for resource strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codepage {
    /// DOS Hebrew (IBM 862)
    #[serde(rename = "cp862")]
    Cp862,
    /// Windows Western European
    #[serde(rename = "windows-1252")]
    Windows1252,
    /// Windows Hebrew
    #[serde(rename = "windows-1255")]
    Windows1255,
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1, byte value == code point
    #[serde(rename = "latin-1")]
    Latin1,
}

/// Upper half (0x80-0xFF) of CP862. The lower half is ASCII.
const CP862_HIGH: [char; 128] = [
    // 0x80: Hebrew letters alef..tav
    'א', 'ב', 'ג', 'ד', 'ה', 'ו', 'ז', 'ח', 'ט', 'י', 'ך', 'כ', 'ל', 'ם', 'מ', 'ן',
    'נ', 'ס', 'ע', 'ף', 'פ', 'ץ', 'צ', 'ק', 'ר', 'ש', 'ת', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0: box drawing
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0: Greek and math
    'α', '\u{00DF}', 'Γ', 'π', 'Σ', 'σ', '\u{00B5}', 'τ', 'Φ', 'Θ', '\u{03A9}', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '\u{2219}', '\u{00B7}', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

impl Codepage {
    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cp862 => "cp862",
            Self::Windows1252 => "windows-1252",
            Self::Windows1255 => "windows-1255",
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or `None` if any byte is unmapped.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Cp862 => Some(
                bytes
                    .iter()
                    .map(|&b| {
                        if b < 0x80 {
                            char::from(b)
                        } else {
                            CP862_HIGH[usize::from(b - 0x80)]
                        }
                    })
                    .collect(),
            ),
            Self::Windows1252 => decode_whatwg(WINDOWS_1252, bytes),
            Self::Windows1255 => decode_whatwg(WINDOWS_1255, bytes),
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode `text`, or `None` if any character has no mapping.
    #[must_use]
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Cp862 => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        u8::try_from(c).ok()
                    } else {
                        CP862_HIGH
                            .iter()
                            .position(|&h| h == c)
                            .and_then(|i| u8::try_from(0x80 + i).ok())
                    }
                })
                .collect(),
            Self::Windows1252 => encode_whatwg(WINDOWS_1252, text),
            Self::Windows1255 => encode_whatwg(WINDOWS_1255, text),
            Self::Utf8 => Some(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        }
    }
}

fn decode_whatwg(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
}

fn encode_whatwg(encoding: &'static Encoding, text: &str) -> Option<Vec<u8>> {
    // encoding_rs substitutes numeric character references for unmappable
    // characters and reports it through the error flag
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        None
    } else {
        Some(bytes.into_owned())
    }
}

impl fmt::Display for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codepage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "cp862" | "ibm862" | "dos-hebrew" => Ok(Self::Cp862),
            "windows-1252" | "cp1252" | "1252" => Ok(Self::Windows1252),
            "windows-1255" | "cp1255" | "1255" => Ok(Self::Windows1255),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Self::Latin1),
            _ => Err(Error::UnknownCodepage(s.to_string())),
        }
    }
}

/// Ordered list of codepages tried until one succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackChain {
    stages: Vec<Codepage>,
}

impl FallbackChain {
    /// Build a chain from explicit stages.
    #[must_use]
    pub fn new(stages: Vec<Codepage>) -> Self {
        Self { stages }
    }

    /// `primary`, then UTF-8, then Latin-1.
    #[must_use]
    pub fn with_primary(primary: Codepage) -> Self {
        let mut stages = vec![primary];
        for fallback in [Codepage::Utf8, Codepage::Latin1] {
            if !stages.contains(&fallback) {
                stages.push(fallback);
            }
        }
        Self { stages }
    }

    #[must_use]
    pub fn stages(&self) -> &[Codepage] {
        &self.stages
    }

    /// The first stage, used as the "expected" codepage in diagnostics.
    #[must_use]
    pub fn primary(&self) -> Codepage {
        self.stages.first().copied().unwrap_or(Codepage::Latin1)
    }

    /// Decode with the first stage that accepts `bytes`.
    ///
    /// Never fails: if no configured stage succeeds, Latin-1 is used.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> (String, Codepage) {
        self.stages
            .iter()
            .find_map(|&cp| cp.decode(bytes).map(|text| (text, cp)))
            .unwrap_or_else(|| (bytes.iter().map(|&b| char::from(b)).collect(), Codepage::Latin1))
    }

    /// Encode with the first stage that can represent `text`.
    ///
    /// Never fails: if no configured stage succeeds, UTF-8 is used.
    #[must_use]
    pub fn encode(&self, text: &str) -> (Vec<u8>, Codepage) {
        self.stages
            .iter()
            .find_map(|&cp| cp.encode(text).map(|bytes| (bytes, cp)))
            .unwrap_or_else(|| (text.as_bytes().to_vec(), Codepage::Utf8))
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::with_primary(Codepage::Windows1255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cp862_hebrew_letters() {
        assert_eq!(Codepage::Cp862.decode(&[0x80, 0x9A]).unwrap(), "את");
        assert_eq!(Codepage::Cp862.encode("שלום").unwrap(), vec![0x99, 0x8C, 0x85, 0x8D]);
        assert_eq!(Codepage::Cp862.decode(b"Hi").unwrap(), "Hi");
    }

    #[test]
    fn test_cp862_round_trips_every_byte() {
        let all: Vec<u8> = (0..=255).collect();
        let text = Codepage::Cp862.decode(&all).unwrap();
        assert_eq!(Codepage::Cp862.encode(&text).unwrap(), all);
    }

    #[test]
    fn test_cp862_encode_rejects_unmapped() {
        assert!(Codepage::Cp862.encode("é日").is_none());
        assert_eq!(Codepage::Cp862.encode("\u{7F}").unwrap(), vec![0x7F]);
        assert_eq!(Codepage::Cp862.encode("\u{A0}").unwrap(), vec![0xFF]);
    }

    #[test]
    fn test_windows_1255_hebrew() {
        assert_eq!(Codepage::Windows1255.encode("שלום").unwrap(), vec![0xF9, 0xEC, 0xE5, 0xED]);
        assert_eq!(Codepage::Windows1255.decode(&[0xE0]).unwrap(), "א");
        assert!(Codepage::Windows1255.encode("日本").is_none());
    }

    #[test]
    fn test_latin1_encode_limits() {
        assert_eq!(Codepage::Latin1.encode("é").unwrap(), vec![0xE9]);
        assert!(Codepage::Latin1.encode("א").is_none());
    }

    #[test]
    fn test_chain_decode_is_total() {
        let chain = FallbackChain::new(vec![Codepage::Utf8]);
        // Invalid UTF-8 still produces the Latin-1 reading
        let (text, used) = chain.decode(&[0xFF, 0x41]);
        assert_eq!(text, "\u{FF}A");
        assert_eq!(used, Codepage::Latin1);

        let chain = FallbackChain::with_primary(Codepage::Utf8);
        for byte in 0..=255u8 {
            let (text, _) = chain.decode(&[byte, 0xC3]);
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn test_chain_encode_falls_back_to_utf8() {
        let chain = FallbackChain::with_primary(Codepage::Windows1255);
        let (bytes, used) = chain.encode("日本");
        assert_eq!(used, Codepage::Utf8);
        assert_eq!(bytes, "日本".as_bytes());

        let (bytes, used) = chain.encode("AB");
        assert_eq!(used, Codepage::Windows1255);
        assert_eq!(bytes, b"AB");
    }

    #[test]
    fn test_parse_codepage_names() {
        assert_eq!("CP862".parse::<Codepage>().unwrap(), Codepage::Cp862);
        assert_eq!("windows-1255".parse::<Codepage>().unwrap(), Codepage::Windows1255);
        assert!("ebcdic".parse::<Codepage>().is_err());
    }
}
