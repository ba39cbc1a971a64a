//! Text resource writing

use std::path::Path;

use super::{TextResource, DEFAULT_CODEPAGE, TEXT_MAGIC};
use crate::error::Result;
use crate::formats::common::{ByteWriter, Diagnostic, FallbackChain};

/// Serialized text resource bytes plus the strings that needed a fallback codepage
#[derive(Debug, Clone)]
pub struct BuiltText {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Write a text resource to disk, encoding strings as Windows-1255
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_text<P: AsRef<Path>>(path: P, resource: &TextResource) -> Result<()> {
    let built = build_text_bytes(resource)?;
    std::fs::write(path, built.bytes)?;
    Ok(())
}

/// Serialize a text resource with the default encoding chain
///
/// # Errors
/// Only fails if the underlying buffer cannot grow.
pub fn build_text_bytes(resource: &TextResource) -> Result<BuiltText> {
    build_text_bytes_with(resource, &FallbackChain::with_primary(DEFAULT_CODEPAGE))
}

/// Serialize a text resource, encoding each string with `chain`
///
/// Output is the magic followed by every string and its NUL terminator,
/// with nothing after the last terminator. A string containing NUL would
/// split on the next read; callers feeding arbitrary input should strip it.
///
/// # Errors
/// Only fails if the underlying buffer cannot grow.
pub fn build_text_bytes_with(resource: &TextResource, chain: &FallbackChain) -> Result<BuiltText> {
    let capacity = TEXT_MAGIC.len() + resource.strings.iter().map(|s| s.len() + 1).sum::<usize>();
    let mut writer = ByteWriter::with_capacity(capacity);
    let mut diagnostics = Vec::new();

    writer.write_bytes(&TEXT_MAGIC)?;
    for (index, text) in resource.strings.iter().enumerate() {
        let (bytes, used) = chain.encode(text);
        if used != chain.primary() {
            tracing::warn!(
                "String {index}: not representable in {}, encoded as {used}",
                chain.primary()
            );
            diagnostics.push(Diagnostic::CodepageFallback {
                index,
                expected: chain.primary(),
                used,
            });
        }
        writer.write_cstr(&bytes)?;
    }

    tracing::debug!(
        "Built text resource: {} strings, {} bytes",
        resource.len(),
        writer.len()
    );

    Ok(BuiltText {
        bytes: writer.into_inner(),
        diagnostics,
    })
}
