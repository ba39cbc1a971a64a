//! Little-endian byte cursor and writer shared by the resource codecs
//!
//! Every read is bounds-checked: asking for more bytes than remain fails with
//! [`Error::TruncatedInput`] instead of returning short or padded data.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

use crate::error::{Error, Result};

/// Read cursor over a byte slice. All reads are little-endian.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the cursor sits at (or past) the end.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remaining bytes from current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seek to an absolute position.
    ///
    /// Seeking exactly to the end is allowed; the next read then fails.
    ///
    /// # Errors
    /// Returns [`Error::SeekOutOfBounds`] if `pos` is past the end.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::SeekOutOfBounds {
                offset: pos,
                len: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Skip `n` bytes forward.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if fewer bytes remain than requested.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if fewer bytes remain than requested.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a fixed-size byte array.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if fewer bytes remain than requested.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// # Errors
    /// Returns [`Error::TruncatedInput`] at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// # Errors
    /// Returns [`Error::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    /// # Errors
    /// Returns [`Error::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read bytes up to the next NUL and consume the terminator.
    ///
    /// The returned slice excludes the NUL. Running off the end of the
    /// buffer before a terminator is a truncation.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedInput`] if no NUL follows the cursor.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        match rest.iter().position(|&b| b == 0) {
            Some(len) => {
                let bytes = &rest[..len];
                self.pos += len + 1;
                Ok(bytes)
            }
            None => Err(Error::TruncatedInput {
                offset: self.pos,
                needed: rest.len() + 1,
                available: rest.len(),
            }),
        }
    }

    fn ensure(&self, n: usize) -> Result<()> {
        let available = self.remaining();
        if n > available {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        Ok(())
    }
}

/// Append-only little-endian writer backed by a `Vec<u8>`.
///
/// Writes go to memory; the `Result`s only surface [`Error::Io`] from the
/// underlying `Write` impl.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write one byte.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the underlying buffer rejects the write.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buf.write_u8(value)?;
        Ok(())
    }

    /// Write a little-endian `u16`.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the underlying buffer rejects the write.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.buf.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian `u32`.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the underlying buffer rejects the write.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buf.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write `bytes` verbatim.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the underlying buffer rejects the write.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.write_all(bytes)?;
        Ok(())
    }

    /// Write `bytes` followed by a single NUL terminator.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the underlying buffer rejects the write.
    pub fn write_cstr(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_bytes(bytes)?;
        self.write_u8(0)
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_little_endian() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xAB];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x12345678);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_past_end_is_truncation() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = ByteReader::new(&data);
        reader.skip(2).unwrap();
        match reader.read_u16() {
            Err(Error::TruncatedInput {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
        // A failed read leaves the position untouched
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_seek_bounds() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data);
        assert!(reader.seek(4).is_ok());
        assert!(reader.read_u8().is_err());
        assert!(matches!(
            reader.seek(5),
            Err(Error::SeekOutOfBounds { offset: 5, len: 4 })
        ));
    }

    #[test]
    fn test_read_cstr() {
        let data = b"AB\0C\0D";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_cstr().unwrap(), b"AB");
        assert_eq!(reader.read_cstr().unwrap(), b"C");
        assert!(matches!(
            reader.read_cstr(),
            Err(Error::TruncatedInput { offset: 5, .. })
        ));
    }

    #[test]
    fn test_writer_appends() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0x87).unwrap();
        writer.write_u16(0x0102).unwrap();
        writer.write_cstr(b"hi").unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![0x87, 0, 0, 0, 0x02, 0x01, b'h', b'i', 0]
        );
    }
}
