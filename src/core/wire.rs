//! Byte-level primitives for the query wire format.
//!
//! All multi-byte values are little-endian. Strings are UTF-8 and terminated
//! by a single NUL with no length prefix. Every read checks the remaining
//! length first, so a short buffer is a [`QueryError::TruncatedResponse`]
//! instead of a panic.

use bytes::{Buf, BufMut};

use crate::error::{QueryError, Result};

/// A forward-only reader over a response buffer.
///
/// `field` names are threaded into errors so a truncation points at the
/// schema entry that ran out of bytes.
#[derive(Debug, Clone, Copy)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    fn ensure(&self, field: &'static str, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(QueryError::TruncatedResponse {
                field,
                needed,
                available: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Discard `count` bytes
    pub fn skip(&mut self, field: &'static str, count: usize) -> Result<()> {
        self.ensure(field, count)?;
        self.buf.advance(count);
        Ok(())
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_i32(&mut self, field: &'static str) -> Result<i32> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_i64(&mut self, field: &'static str) -> Result<i64> {
        self.ensure(field, 8)?;
        Ok(self.buf.get_i64_le())
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_f32_le())
    }

    /// Read a NUL-terminated string and step past the terminator.
    ///
    /// An immediate NUL is an empty string. A missing terminator means the
    /// response was cut short. Invalid UTF-8 sequences are replaced with
    /// U+FFFD rather than rejected; servers do send mangled names.
    pub fn read_cstring(&mut self, field: &'static str) -> Result<String> {
        let end = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(QueryError::TruncatedResponse {
                field,
                needed: self.buf.len() + 1,
                available: self.buf.len(),
            })?;

        let value = String::from_utf8_lossy(&self.buf[..end]).into_owned();
        self.buf.advance(end + 1);
        Ok(value)
    }
}

/// Append a NUL-terminated string
pub fn put_cstring<B: BufMut>(buf: &mut B, value: &str) {
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
}
