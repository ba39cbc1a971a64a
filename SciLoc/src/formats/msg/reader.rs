//! Message resource reading and parsing

use std::path::Path;

use super::{MessageRecord, MessageTable, DEFAULT_CODEPAGE};
use crate::error::Result;
use crate::formats::common::{ByteReader, Diagnostic, FallbackChain, POINTER_BIAS};

/// A parsed message table plus what was noticed while reading it
#[derive(Debug, Clone)]
pub struct ParsedMessages {
    pub table: MessageTable,
    /// `data_size` as stored in the header (recomputed on build)
    pub data_size: u16,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read a message resource from disk with the default decoding chain
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
/// Returns [`Error::TruncatedInput`] if a record or text lies past the end.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn read_msg<P: AsRef<Path>>(path: P) -> Result<MessageTable> {
    let data = std::fs::read(path)?;
    parse_msg_bytes(&data)
}

/// Parse a message resource with the default decoding chain (Windows-1255, UTF-8, Latin-1)
///
/// # Errors
/// Returns [`Error::TruncatedInput`] if the data is shorter than the header,
/// record table or any referenced text requires.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn parse_msg_bytes(data: &[u8]) -> Result<MessageTable> {
    let chain = FallbackChain::with_primary(DEFAULT_CODEPAGE);
    parse_msg_bytes_with(data, &chain).map(|parsed| parsed.table)
}

/// Parse a message resource, decoding texts with `chain`
///
/// Decoding never fails: the chain ends in a total codepage, and strings
/// that needed a fallback are reported as [`Diagnostic::CodepageFallback`].
///
/// # Errors
/// Returns [`Error::TruncatedInput`] or [`Error::SeekOutOfBounds`] if the
/// data is shorter than a declared field or text offset demands.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
/// [`Error::SeekOutOfBounds`]: crate::Error::SeekOutOfBounds
pub fn parse_msg_bytes_with(data: &[u8], chain: &FallbackChain) -> Result<ParsedMessages> {
    let mut reader = ByteReader::new(data);

    let res_type = reader.read_u8()?;
    let header_size = reader.read_u8()?;
    let sci_version = reader.read_u32()?;
    let data_size = reader.read_u16()?;
    let last_id = reader.read_u16()?;
    let count = usize::from(reader.read_u16()?);

    tracing::debug!(
        "Message header: type={res_type:#x}, version={sci_version}, data_size={data_size}, last_id={last_id}, count={count}"
    );

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let noun = reader.read_u8()?;
        let verb = reader.read_u8()?;
        let case = reader.read_u8()?;
        let sequence = reader.read_u8()?;
        let talker = reader.read_u8()?;
        let text_offset = reader.read_u16()?;
        let ref_noun = reader.read_u8()?;
        let ref_verb = reader.read_u8()?;
        let ref_case = reader.read_u8()?;
        let ref_sequence = reader.read_u8()?;

        records.push(MessageRecord {
            noun,
            verb,
            case,
            sequence,
            talker,
            text_offset,
            ref_noun,
            ref_verb,
            ref_case,
            ref_sequence,
            text: String::new(),
        });
    }

    let mut diagnostics = Vec::new();
    for (index, record) in records.iter_mut().enumerate() {
        reader.seek(usize::from(record.text_offset) + POINTER_BIAS)?;
        let raw = reader.read_cstr()?;

        let (text, used) = chain.decode(raw);
        if used != chain.primary() {
            tracing::debug!("Message {index}: decoded as {used} instead of {}", chain.primary());
            diagnostics.push(Diagnostic::CodepageFallback {
                index,
                expected: chain.primary(),
                used,
            });
        }
        record.text = text;
    }

    Ok(ParsedMessages {
        table: MessageTable {
            res_type,
            header_size,
            sci_version,
            last_id,
            records,
        },
        data_size,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::common::Codepage;

    #[test]
    fn test_parse_single_message() {
        let data = [
            0x0F, 0x00, // resource header
            0x92, 0x13, 0, 0, // version 5010
            18, 0, // data size
            7, 0, // last id
            1, 0, // count
            1, 2, 3, 4, 5, 21, 0, 6, 7, 8, 9, // record, text at 23
            b'H', b'i', 0,
        ];

        let parsed = parse_msg_bytes_with(&data, &FallbackChain::default()).unwrap();
        let table = parsed.table;
        assert_eq!(table.res_type, 0x0F);
        assert_eq!(table.sci_version, 5010);
        assert_eq!(table.last_id, 7);
        assert_eq!(parsed.data_size, 18);
        assert_eq!(table.len(), 1);

        let record = &table.records[0];
        assert_eq!(record.key(), (1, 2, 3, 4));
        assert_eq!(record.talker, 5);
        assert_eq!(record.text_offset, 21);
        assert_eq!(
            (record.ref_noun, record.ref_verb, record.ref_case, record.ref_sequence),
            (6, 7, 8, 9)
        );
        assert_eq!(record.text, "Hi");
    }

    #[test]
    fn test_truncated_record_table() {
        let data = [0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1, 2, 3];
        assert!(matches!(
            parse_msg_bytes(&data),
            Err(Error::TruncatedInput { offset: 15, .. })
        ));
    }

    #[test]
    fn test_unterminated_text_is_truncation() {
        let data = [
            0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, // header
            1, 0, 0, 1, 0, 21, 0, 0, 0, 0, 0, // record, text at 23
            b'N', b'o',
        ];
        assert!(matches!(
            parse_msg_bytes(&data),
            Err(Error::TruncatedInput { offset: 23, .. })
        ));
    }

    #[test]
    fn test_offset_past_end() {
        let data = [
            0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, // header
            1, 0, 0, 1, 0, 0xFF, 0, 0, 0, 0, 0, // record points far away
        ];
        assert!(matches!(
            parse_msg_bytes(&data),
            Err(Error::SeekOutOfBounds { offset: 257, .. })
        ));
    }

    #[test]
    fn test_cp862_primary_decodes_hebrew() {
        let data = [
            0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, // header
            1, 0, 0, 1, 0, 21, 0, 0, 0, 0, 0, // record, text at 23
            0x99, 0x8C, 0x85, 0x8D, 0,
        ];
        let chain = FallbackChain::with_primary(Codepage::Cp862);
        let parsed = parse_msg_bytes_with(&data, &chain).unwrap();
        assert_eq!(parsed.table.records[0].text, "שלום");
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_fallback_reported() {
        let data = [
            0x0F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, // header
            1, 0, 0, 1, 0, 21, 0, 0, 0, 0, 0, // record, text at 23
            0xC3, 0xA9, 0,
        ];
        let chain = FallbackChain::new(vec![Codepage::Windows1255, Codepage::Utf8, Codepage::Latin1]);
        // 0xC3 0xA9 is valid Windows-1255, so no fallback
        let parsed = parse_msg_bytes_with(&data, &chain).unwrap();
        assert!(parsed.diagnostics.is_empty());

        let chain = FallbackChain::with_primary(Codepage::Utf8);
        let mut bad = data.to_vec();
        bad[23] = 0xFF;
        let parsed = parse_msg_bytes_with(&bad, &chain).unwrap();
        assert_eq!(parsed.table.records[0].text, "\u{FF}\u{A9}");
        assert_eq!(
            parsed.diagnostics,
            vec![Diagnostic::CodepageFallback {
                index: 0,
                expected: Codepage::Utf8,
                used: Codepage::Latin1,
            }]
        );
    }
}
