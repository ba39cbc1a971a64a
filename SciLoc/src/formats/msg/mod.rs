//! SCI 1.1+ message resource format
//!
//! A message resource is a table of fixed-size records, each addressing a
//! NUL-terminated text by byte offset:
//!
//! ```text
//! u8 res_type | u8 header_size | u32 sci_version
//! u16 data_size | u16 last_id | u16 count
//! count × { u8 noun, u8 verb, u8 case, u8 sequence, u8 talker,
//!           u16 text_offset, u8 ref_noun, u8 ref_verb, u8 ref_case, u8 ref_sequence }
//! texts: NUL-terminated, in record order
//! ```
//!
//! `text_offset` is absolute from byte 2 of the resource (the engine skips
//! the 2-byte resource header before applying it), so a text stored at file
//! position `p` has `text_offset = p - 2`. Offsets are always recomputed
//! when building; the values carried by parsed records are informational.
//! `data_size` counts every byte after the field itself.

mod reader;
mod writer;

pub use reader::{parse_msg_bytes, parse_msg_bytes_with, read_msg, ParsedMessages};
pub use writer::{build_msg_bytes, build_msg_bytes_with, compute_layout, write_msg, MessageLayout};

use crate::formats::common::{Codepage, FallbackChain};

/// Bytes before the record table: resource header, version, data size, last id, count
pub const HEADER_SIZE: usize = 12;

/// Size of one record in the record table
pub const RECORD_SIZE: usize = 11;

/// Resource type byte written for new message resources
pub const DEFAULT_RES_TYPE: u8 = 0x0F;

/// Interpreter version written for new message resources
pub const DEFAULT_SCI_VERSION: u32 = 5010;

/// Primary codepage of [`parse_msg_bytes`] and [`build_msg_bytes`]
pub const DEFAULT_CODEPAGE: Codepage = Codepage::Windows1255;

/// Codepage of the shipped (DOS Hebrew) message resources
///
/// Only the decode default of [`MsgOptions`](crate::config::MsgOptions);
/// exporting with it and rebuilding with [`DEFAULT_CODEPAGE`] converts
/// CP862 resources to Windows-1255.
pub const SOURCE_CODEPAGE: Codepage = Codepage::Cp862;

/// One localizable message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRecord {
    pub noun: u8,
    pub verb: u8,
    pub case: u8,
    pub sequence: u8,
    pub talker: u8,
    /// Biased text offset as read from disk (ignored when building)
    pub text_offset: u16,
    pub ref_noun: u8,
    pub ref_verb: u8,
    pub ref_case: u8,
    pub ref_sequence: u8,
    pub text: String,
}

impl MessageRecord {
    /// Create a record with the given tuple and text, no talker or reference
    #[must_use]
    pub fn new(noun: u8, verb: u8, case: u8, sequence: u8, text: impl Into<String>) -> Self {
        Self {
            noun,
            verb,
            case,
            sequence,
            text: text.into(),
            ..Self::default()
        }
    }

    /// The (noun, verb, case, sequence) tuple scripts use to look up messages
    #[must_use]
    pub fn key(&self) -> (u8, u8, u8, u8) {
        (self.noun, self.verb, self.case, self.sequence)
    }

    /// Whether this record points at another message instead of its own text
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.ref_noun != 0 || self.ref_verb != 0 || self.ref_case != 0 || self.ref_sequence != 0
    }
}

/// A complete message resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    /// First header byte (resource type)
    pub res_type: u8,
    /// Second header byte
    pub header_size: u8,
    /// Opaque interpreter version, preserved for round trips
    pub sci_version: u32,
    pub last_id: u16,
    /// Records in on-disk order; position is the record's identity
    pub records: Vec<MessageRecord>,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self {
            res_type: DEFAULT_RES_TYPE,
            header_size: 0,
            sci_version: DEFAULT_SCI_VERSION,
            last_id: 0,
            records: Vec::new(),
        }
    }
}

impl MessageTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the first record with the given lookup tuple
    #[must_use]
    pub fn find(&self, noun: u8, verb: u8, case: u8, sequence: u8) -> Option<&MessageRecord> {
        self.records
            .iter()
            .find(|r| r.key() == (noun, verb, case, sequence))
    }

    /// Records sorted by (noun, verb, case, sequence), stable for equal keys
    #[must_use]
    pub fn sorted_by_key(&self) -> Vec<&MessageRecord> {
        let mut sorted: Vec<_> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.key());
        sorted
    }

    /// Recompute every record's `text_offset` for the given encoding
    ///
    /// Useful before exporting a rebuilt table so the offsets shown match
    /// the bytes that will be written.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableTooLarge`] if the offsets overflow 16 bits.
    pub fn refresh_offsets(&mut self, chain: &FallbackChain) -> crate::error::Result<()> {
        let layout = compute_layout(self, chain)?;
        for (record, offset) in self.records.iter_mut().zip(layout.offsets) {
            record.text_offset = offset;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_and_sort() {
        let mut table = MessageTable::new();
        table.records.push(MessageRecord::new(2, 0, 0, 1, "b"));
        table.records.push(MessageRecord::new(1, 3, 0, 1, "a"));
        table.records.push(MessageRecord::new(1, 2, 0, 1, "c"));

        assert_eq!(table.find(1, 3, 0, 1).unwrap().text, "a");
        assert!(table.find(9, 9, 9, 9).is_none());

        let texts: Vec<_> = table.sorted_by_key().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
        // Sorting a view never reorders the table itself
        assert_eq!(table.records[0].text, "b");
    }

    #[test]
    fn test_refresh_offsets() {
        let mut table = MessageTable::new();
        table.records.push(MessageRecord::new(1, 0, 0, 1, "A"));
        table.records.push(MessageRecord::new(1, 0, 0, 2, "BB"));
        table.records[0].text_offset = 999;
        table.refresh_offsets(&FallbackChain::default()).unwrap();
        // texts start at 12 + 2 * 11 = 34
        assert_eq!(table.records[0].text_offset, 32);
        assert_eq!(table.records[1].text_offset, 34);
    }
}
