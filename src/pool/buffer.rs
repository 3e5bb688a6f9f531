//! Growable byte buffer with a read cursor.
//!
//! Writes append to the end, reads consume from the cursor. The backing
//! capacity is always reported from offset zero by [`Buffer::full_capacity`],
//! independent of how much has already been read.

use bytes::buf::UninitSlice;
use bytes::{Buf, BufMut};
use std::io;

/// Owned, growable byte buffer.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    /// Backing storage; `buf[..off]` has already been read.
    buf: Vec<u8>,
    /// Read cursor.
    off: usize,
}

impl Buffer {
    /// Create an empty buffer without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with exactly `capacity` bytes of backing storage.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            off: 0,
        }
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len() - self.off
    }

    /// Check if there are no unread bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity measured from the read cursor.
    ///
    /// This undercounts the real allocation once bytes have been read; use
    /// [`full_capacity`](Self::full_capacity) to size the backing storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity() - self.off
    }

    /// Capacity of the backing storage measured from offset zero.
    #[inline]
    pub fn full_capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The unread bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.off..]
    }

    /// Discard all contents, keeping the backing storage.
    ///
    /// Only the length and cursor are reset; stale bytes are not zeroed.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
        self.off = 0;
    }

    /// Keep only the first `n` unread bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than [`len`](Self::len).
    pub fn truncate(&mut self, n: usize) {
        if n == 0 {
            self.reset();
            return;
        }
        assert!(n <= self.len(), "truncate out of range: {} > {}", n, self.len());
        self.buf.truncate(self.off + n);
    }

    /// Ensure room for at least `additional` more bytes without reallocating.
    pub fn grow(&mut self, additional: usize) {
        if self.is_empty() && self.off > 0 {
            self.reset();
        }
        self.buf.reserve(additional);
    }

    /// Append `data` to the end of the buffer.
    #[inline]
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Consume the buffer, returning the unread bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.off > 0 {
            self.buf.drain(..self.off);
        }
        self.buf
    }

    /// Address of the backing allocation, for ownership bookkeeping.
    pub(crate) fn storage_addr(&self) -> usize {
        self.buf.as_ptr() as usize
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf, off: 0 }
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Buf for Buffer {
    #[inline]
    fn remaining(&self) -> usize {
        self.len()
    }

    #[inline]
    fn chunk(&self) -> &[u8] {
        self.as_slice()
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.len(),
            "cannot advance past end: {} > {}",
            cnt,
            self.len()
        );
        self.off += cnt;
    }
}

// SAFETY: every method forwards to `Vec<u8>`'s `BufMut` impl, which only
// appends past `buf.len()` and never touches the read region `buf[..off]`.
unsafe impl BufMut for Buffer {
    #[inline]
    fn remaining_mut(&self) -> usize {
        self.buf.remaining_mut()
    }

    #[inline]
    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.buf.advance_mut(cnt);
    }

    #[inline]
    fn chunk_mut(&mut self) -> &mut UninitSlice {
        self.buf.chunk_mut()
    }
}

impl io::Read for Buffer {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.is_empty() {
            // Rewind so the storage can be reused by later writes.
            self.reset();
            return Ok(0);
        }
        let n = out.len().min(self.len());
        out[..n].copy_from_slice(&self.buf[self.off..self.off + n]);
        self.off += n;
        Ok(n)
    }
}

impl io::Write for Buffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_with_capacity_is_exact() {
        let buf = Buffer::with_capacity(1024);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 1024);
        assert_eq!(buf.full_capacity(), 1024);
    }

    #[test]
    fn test_zero_capacity() {
        let buf = Buffer::with_capacity(0);
        assert!(buf.is_empty());
        assert_eq!(buf.full_capacity(), 0);
    }

    #[test]
    fn test_capacity_after_partial_read() {
        let mut buf = Buffer::with_capacity(64);
        buf.extend_from_slice(b"hello world");
        buf.advance(6);

        assert_eq!(buf.as_slice(), b"world");
        assert_eq!(buf.capacity(), 58);
        assert_eq!(buf.full_capacity(), 64);
    }

    #[test]
    fn test_reset_keeps_storage() {
        let mut buf = Buffer::with_capacity(32);
        buf.extend_from_slice(b"abcdef");
        buf.advance(2);
        buf.reset();

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 32);
        assert_eq!(buf.full_capacity(), 32);
    }

    #[test]
    fn test_grow_reserves_space() {
        let mut buf = Buffer::with_capacity(1024);
        buf.grow(3072);
        assert!(buf.full_capacity() >= 3072);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_grow_rewinds_exhausted_buffer() {
        let mut buf = Buffer::with_capacity(16);
        buf.extend_from_slice(b"0123456789");
        buf.advance(10);
        buf.grow(16);

        // Rewound rather than reallocated.
        assert_eq!(buf.full_capacity(), 16);
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn test_truncate() {
        let mut buf = Buffer::from(b"abcdef".to_vec());
        buf.advance(1);
        buf.truncate(3);
        assert_eq!(buf.as_slice(), b"bcd");

        buf.truncate(0);
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_truncate_out_of_range() {
        let mut buf = Buffer::from(b"abc".to_vec());
        buf.truncate(4);
    }

    #[test]
    fn test_buf_mut_and_buf() {
        let mut buf = Buffer::with_capacity(16);
        buf.put_u32(0xdead_beef);
        buf.put_slice(b"xy");
        assert_eq!(buf.len(), 6);

        assert_eq!(buf.get_u32(), 0xdead_beef);
        assert_eq!(buf.chunk(), b"xy");
        assert_eq!(buf.remaining(), 2);
    }

    #[test]
    fn test_io_read_write() {
        let mut buf = Buffer::new();
        buf.write_all(b"stream data").unwrap();

        let mut out = [0u8; 6];
        assert_eq!(buf.read(&mut out).unwrap(), 6);
        assert_eq!(&out, b"stream");

        let mut rest = Vec::new();
        buf.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b" data");

        // Exhausted read rewinds the cursor.
        assert_eq!(buf.capacity(), buf.full_capacity());
    }

    #[test]
    fn test_into_vec_drops_read_prefix() {
        let mut buf = Buffer::from(b"header:body".to_vec());
        buf.advance(7);
        assert_eq!(buf.into_vec(), b"body");
    }
}
