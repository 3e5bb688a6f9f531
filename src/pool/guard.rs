//! RAII lease over a pooled buffer.
//!
//! The guard borrows the pool it came from and releases the buffer back to
//! it when dropped.

use std::mem;
use std::ops::{Deref, DerefMut};

use super::{Buffer, LeakyBufferPool};

/// RAII guard that returns its buffer to the owning pool on drop.
pub struct PooledBuffer<'a> {
    pool: &'a LeakyBufferPool,
    buf: Buffer,
}

impl<'a> PooledBuffer<'a> {
    pub(crate) fn new(pool: &'a LeakyBufferPool, buf: Buffer) -> Self {
        Self { pool, buf }
    }

    /// Take the buffer, preventing return to pool.
    pub fn into_inner(mut self) -> Buffer {
        let buf = mem::take(&mut self.buf);
        // Nothing left to release; the placeholder never allocated.
        mem::forget(self);
        buf
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.buf));
    }
}
