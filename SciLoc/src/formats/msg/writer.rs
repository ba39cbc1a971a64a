//! Message resource writing

#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use super::{MessageTable, DEFAULT_CODEPAGE, HEADER_SIZE, RECORD_SIZE};
use crate::error::{Error, Result};
use crate::formats::common::{ByteWriter, Diagnostic, FallbackChain, POINTER_BIAS};

/// Bytes between the start of the resource and the end of the `data_size` field
const DATA_SIZE_END: usize = 8;

/// Encoded texts and the offsets/sizes derived from them
#[derive(Debug, Clone)]
pub struct MessageLayout {
    /// Encoded text of each record, without terminator
    pub encoded: Vec<Vec<u8>>,
    /// Biased text offset of each record
    pub offsets: Vec<u16>,
    /// Value of the header's `data_size` field
    pub data_size: u16,
    /// Records whose text needed a fallback codepage
    pub diagnostics: Vec<Diagnostic>,
}

/// Encode every text and derive the record offsets
///
/// `text_offset[i] = 12 + count * 11 + Σ_{j<i} (len(text[j]) + 1) - 2`
///
/// # Errors
/// Returns [`Error::TableTooLarge`] if the record count, an offset, or the
/// data size does not fit in 16 bits.
pub fn compute_layout(table: &MessageTable, chain: &FallbackChain) -> Result<MessageLayout> {
    let count = table.records.len();
    if count > usize::from(u16::MAX) {
        return Err(Error::TableTooLarge {
            message: format!("{count} records"),
        });
    }

    let mut encoded = Vec::with_capacity(count);
    let mut offsets = Vec::with_capacity(count);
    let mut diagnostics = Vec::new();
    let mut position = HEADER_SIZE + count * RECORD_SIZE;

    for (index, record) in table.records.iter().enumerate() {
        let (bytes, used) = chain.encode(&record.text);
        if used != chain.primary() {
            tracing::warn!(
                "Message {index}: text not representable in {}, encoded as {used}",
                chain.primary()
            );
            diagnostics.push(Diagnostic::CodepageFallback {
                index,
                expected: chain.primary(),
                used,
            });
        }

        let offset = u16::try_from(position - POINTER_BIAS).map_err(|_| Error::TableTooLarge {
            message: format!("text {index} starts at offset {position}"),
        })?;
        offsets.push(offset);
        position += bytes.len() + 1;
        encoded.push(bytes);
    }

    let data_size = u16::try_from(position - DATA_SIZE_END).map_err(|_| Error::TableTooLarge {
        message: format!("data size {} exceeds 65535 bytes", position - DATA_SIZE_END),
    })?;

    Ok(MessageLayout {
        encoded,
        offsets,
        data_size,
        diagnostics,
    })
}

/// Write a message resource to disk with the default encoding chain
///
/// # Errors
/// Returns an error if the table is too large or the file cannot be written.
pub fn write_msg<P: AsRef<Path>>(path: P, table: &MessageTable) -> Result<()> {
    let data = build_msg_bytes(table)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Serialize a message table, encoding texts as Windows-1255 (UTF-8, Latin-1 fallback)
///
/// # Errors
/// Returns [`Error::TableTooLarge`] if offsets overflow 16 bits.
pub fn build_msg_bytes(table: &MessageTable) -> Result<Vec<u8>> {
    build_msg_bytes_with(table, &FallbackChain::with_primary(DEFAULT_CODEPAGE))
}

/// Serialize a message table, encoding texts with `chain`
///
/// The records' stored `text_offset` values are ignored; offsets and
/// `data_size` are derived from the encoded texts.
///
/// # Errors
/// Returns [`Error::TableTooLarge`] if offsets overflow 16 bits.
pub fn build_msg_bytes_with(table: &MessageTable, chain: &FallbackChain) -> Result<Vec<u8>> {
    let layout = compute_layout(table, chain)?;
    let count = table.records.len();
    let total = DATA_SIZE_END + usize::from(layout.data_size);
    let mut writer = ByteWriter::with_capacity(total);

    writer.write_u8(table.res_type)?;
    writer.write_u8(table.header_size)?;
    writer.write_u32(table.sci_version)?;
    writer.write_u16(layout.data_size)?;
    writer.write_u16(table.last_id)?;
    // count fits: checked by compute_layout
    writer.write_u16(count as u16)?;

    for (record, &offset) in table.records.iter().zip(&layout.offsets) {
        writer.write_u8(record.noun)?;
        writer.write_u8(record.verb)?;
        writer.write_u8(record.case)?;
        writer.write_u8(record.sequence)?;
        writer.write_u8(record.talker)?;
        writer.write_u16(offset)?;
        writer.write_u8(record.ref_noun)?;
        writer.write_u8(record.ref_verb)?;
        writer.write_u8(record.ref_case)?;
        writer.write_u8(record.ref_sequence)?;
    }

    for text in &layout.encoded {
        writer.write_cstr(text)?;
    }

    tracing::debug!(
        "Built message table: {count} records, data_size={}, {} bytes",
        layout.data_size,
        writer.len()
    );

    Ok(writer.into_inner())
}
