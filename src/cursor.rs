//! A bounded byte cursor (component A): a fixed-capacity buffer with one
//! shared read/write position, the Rust counterpart of `crefl_buf`/
//! `crefl_span` in `cbuf.h`. Every primitive is little-endian regardless of
//! host, to keep the on-disk container portable, matching `cbuf.h`'s `le*`
//! byte-swap macros rather than its host-endian passthrough on a
//! little-endian host.
//!
//! [`crate::container`] layers `bincode`'s little-endian fixed-width
//! encoding on top of this cursor's `Read`/`Write` impls for the on-disk
//! header and node records, the same role `idb-rs` gives `bincode` for
//! IDA's binary fields. The cursor itself only deals in raw bytes; the
//! variable-length codecs in [`crate::varint`] and [`crate::asn1`] read and
//! write through it by hand because their layouts aren't `bincode`'s shape.

use std::fmt;

/// Errors a cursor read/write can hit on malformed or truncated input.
/// Never produced by a panic — every cursor method that can fail returns
/// this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A write would advance the position past the buffer's capacity.
    Overflow { at: usize, need: usize, capacity: usize },
    /// A read needs more bytes than remain in the buffer.
    Underflow { at: usize, need: usize, available: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Overflow { at, need, capacity } => write!(
                f,
                "write of {need} bytes at offset {at} would exceed capacity {capacity}"
            ),
            CodecError::Underflow { at, need, available } => write!(
                f,
                "read of {need} bytes at offset {at} exceeds the {available} bytes remaining"
            ),
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = Result<T, CodecError>;

/// A span of the cursor's own buffer starting at its current position, the
/// counterpart of `crefl_buf_remaining`'s `crefl_span`.
pub struct Span<'a> {
    pub data: &'a [u8],
}

/// Fixed-capacity byte buffer with one read/write position. Growable
/// buffers are out of scope here — a cursor's capacity is set at
/// construction and every write past it fails rather than reallocating,
/// mirroring `crefl_buf_new(size)`'s fixed allocation.
#[derive(Debug, Clone)]
pub struct Cursor {
    data: Vec<u8>,
    pos: usize,
}

impl Cursor {
    /// A cursor over `capacity` zeroed bytes, position 0.
    pub fn with_capacity(capacity: usize) -> Self {
        Cursor { data: vec![0u8; capacity], pos: 0 }
    }

    /// A cursor over existing bytes (e.g. bytes just read off disk),
    /// position 0.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Cursor { data, pos: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The unread span from the current position to the end of the buffer.
    pub fn remaining(&self) -> Span<'_> {
        Span { data: &self.data[self.pos..] }
    }

    fn check_write(&self, len: usize) -> CodecResult<()> {
        if self.pos + len > self.data.len() {
            return Err(CodecError::Overflow { at: self.pos, need: len, capacity: self.data.len() });
        }
        Ok(())
    }

    fn check_read(&self, len: usize) -> CodecResult<()> {
        if self.pos + len > self.data.len() {
            return Err(CodecError::Underflow {
                at: self.pos,
                need: len,
                available: self.data.len() - self.pos,
            });
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, s: &[u8]) -> CodecResult<usize> {
        self.check_write(s.len())?;
        self.data[self.pos..self.pos + s.len()].copy_from_slice(s);
        self.pos += s.len();
        Ok(s.len())
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        self.check_read(len)?;
        let out = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(out)
    }

    pub fn write_u8(&mut self, val: u8) -> CodecResult<usize> {
        self.write_bytes(&[val])
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        self.check_read(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn write_u16(&mut self, val: u16) -> CodecResult<usize> {
        self.write_fixed(&val.to_le_bytes())
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        let mut buf = [0u8; 2];
        self.read_fixed(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn write_u32(&mut self, val: u32) -> CodecResult<usize> {
        self.write_fixed(&val.to_le_bytes())
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let mut buf = [0u8; 4];
        self.read_fixed(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn write_u64(&mut self, val: u64) -> CodecResult<usize> {
        self.write_fixed(&val.to_le_bytes())
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        let mut buf = [0u8; 8];
        self.read_fixed(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn write_fixed(&mut self, bytes: &[u8]) -> CodecResult<usize> {
        self.write_bytes(bytes)
    }

    fn read_fixed(&mut self, out: &mut [u8]) -> CodecResult<()> {
        self.check_read(out.len())?;
        out.copy_from_slice(&self.data[self.pos..self.pos + out.len()]);
        self.pos += out.len();
        Ok(())
    }
}

impl std::io::Read for Cursor {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl std::io::Write for Cursor {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.data.len() - self.pos);
        self.data[self.pos..self.pos + n].copy_from_slice(&buf[..n]);
        self.pos += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
