//! Little-endian integer and fixed-width byte primitives, plus `isolate`,
//! the sub-stream-budget combinator every higher-level decoder is built on.

use crate::error::{Result, YxdbError};

/// A cursor over an in-memory byte slice. All reads advance `pos`; short
/// reads fail with [`YxdbError::Truncated`] rather than panicking.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position, for error reporting.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes remaining after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Read exactly `n` bytes, advancing the cursor. Fails with `Truncated`
    /// if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize, label: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(YxdbError::truncated(self.pos, n - self.remaining(), label));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u16(&mut self, label: &'static str) -> Result<u16> {
        let b = self.read_bytes(2, label)?;
        Ok(u16::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_u32(&mut self, label: &'static str) -> Result<u32> {
        let b = self.read_bytes(4, label)?;
        Ok(u32::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_u64(&mut self, label: &'static str) -> Result<u64> {
        let b = self.read_bytes(8, label)?;
        Ok(u64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_i64(&mut self, label: &'static str) -> Result<i64> {
        let b = self.read_bytes(8, label)?;
        Ok(i64::from_le_bytes(b.try_into().unwrap()))
    }

    /// Run `parser` against a sub-stream of exactly `n` bytes. Fails with
    /// [`YxdbError::IsolationMismatch`] if `parser` consumes fewer or more
    /// than `n` bytes, or if fewer than `n` bytes are available at all.
    pub fn isolate<T>(
        &mut self,
        n: usize,
        label: &'static str,
        parser: impl FnOnce(&mut Reader<'a>) -> Result<T>,
    ) -> Result<T> {
        let start = self.pos;
        let slice = self.read_bytes(n, label)?;
        let mut sub = Reader::new(slice);
        // The sub-reader's buffer is bounded to exactly `n` bytes, so a
        // `Truncated` error out of `parser` means it declared/demanded more
        // than the isolated budget, not a plain short read — report it as
        // the over-consumption it is, not a generic truncation.
        let value = parser(&mut sub).map_err(|e| match e {
            YxdbError::Truncated { expected, .. } => {
                YxdbError::isolation_mismatch(start, n, n + expected, label)
            }
            other => other,
        })?;
        if sub.pos != n {
            return Err(YxdbError::isolation_mismatch(start, n, sub.pos, label));
        }
        Ok(value)
    }
}

/// Fixed-width little-endian encoders, the write-side counterpart of `Reader`.
pub fn write_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_i64(out: &mut Vec<u8>, v: i64) {
    out.extend_from_slice(&v.to_le_bytes());
}
