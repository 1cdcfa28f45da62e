//! Bounds-checked reads over a raw key or value.

use super::{bytes_to_int, ByteOrder, FixedInt};
use crate::error::{DumpError, DumpResult};

/// Sequential reader over a byte slice.
///
/// Every read checks the remaining length and fails with
/// [`DumpError::MalformedRecord`] instead of panicking on truncated data.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteCursor<'a> {
    /// Start reading `buf`; `what` names the buffer in error messages.
    pub fn new(buf: &'a [u8], what: &'static str) -> Self {
        Self { buf, pos: 0, what }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> DumpResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                DumpError::malformed(format!(
                    "{} too short: need {} bytes at offset {}, have {}",
                    self.what,
                    len,
                    self.pos,
                    self.buf.len()
                ))
            })?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Take everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }

    /// Read a fixed-width integer.
    pub fn read<T: FixedInt>(&mut self, order: ByteOrder) -> DumpResult<T> {
        let bytes = self.take(T::WIDTH)?;
        Ok(bytes_to_int(bytes, order))
    }
}

/// Slice `buf[start..start + len]`, failing on overflow.
pub(crate) fn slice<'a>(
    buf: &'a [u8],
    start: usize,
    len: usize,
    what: &str,
) -> DumpResult<&'a [u8]> {
    start
        .checked_add(len)
        .and_then(|end| buf.get(start..end))
        .ok_or_else(|| {
            DumpError::malformed(format!(
                "{} out of bounds: {}..{} of {} bytes",
                what,
                start,
                start.saturating_add(len),
                buf.len()
            ))
        })
}
