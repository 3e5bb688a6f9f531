//! Lock-free leaky buffer pool.
//!
//! Buffers live in a bounded [`ArrayQueue`]. Acquiring from an empty pool
//! allocates, releasing into a full pool drops the buffer, and buffers whose
//! backing storage grew beyond the configured allocation size are replaced
//! before they are pooled again. Nothing ever blocks or fails.

use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};

use super::{Buffer, PooledBuffer};

/// Default allocation size for pooled buffers.
pub const DEFAULT_ALLOC_SIZE: usize = 8192;

/// Default number of slots in a pool.
pub const DEFAULT_SLOTS: usize = 256;

/// Relaxed ordering for counters (eventual visibility is fine for stats).
const RELAXED: Ordering = Ordering::Relaxed;

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of resident buffers.
    pub slots: usize,
    /// Capacity of new buffers and the largest capacity the pool keeps.
    pub alloc_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            alloc_size: DEFAULT_ALLOC_SIZE,
        }
    }
}

impl PoolConfig {
    /// Set the slot count
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }

    /// Set the allocation size
    pub fn with_alloc_size(mut self, alloc_size: usize) -> Self {
        self.alloc_size = alloc_size;
        self
    }
}

/// Bounded pool of reusable [`Buffer`]s.
///
/// Share it by reference or behind an `Arc`; there is no process-wide
/// instance.
pub struct LeakyBufferPool {
    /// Resident buffers. `None` for a zero-slot pool, which keeps nothing.
    slots: Option<ArrayQueue<Buffer>>,
    /// Capacity of new buffers; larger ones are replaced on release.
    alloc_size: usize,
    /// Statistics: buffers taken from the pool.
    hits: AtomicUsize,
    /// Statistics: buffers allocated because the pool was empty.
    misses: AtomicUsize,
    /// Statistics: buffers accepted back into the pool.
    returns: AtomicUsize,
    /// Statistics: oversized buffers replaced on release.
    replaced: AtomicUsize,
    /// Statistics: buffers dropped because the pool was full.
    drops: AtomicUsize,
}

impl LeakyBufferPool {
    /// Create an empty pool holding at most `slots` buffers of `alloc_size`
    /// bytes each.
    pub fn new(slots: usize, alloc_size: usize) -> Self {
        debug!("Creating buffer pool: {} slots, {} byte buffers", slots, alloc_size);
        Self {
            slots: (slots > 0).then(|| ArrayQueue::new(slots)),
            alloc_size,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            returns: AtomicUsize::new(0),
            replaced: AtomicUsize::new(0),
            drops: AtomicUsize::new(0),
        }
    }

    /// Create a pool from a [`PoolConfig`].
    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.slots, config.alloc_size)
    }

    /// Take a buffer from the pool, or allocate a new one if none is resident.
    ///
    /// Pooled buffers are handed out as they were stored: empty, with at
    /// most `alloc_size` bytes of capacity.
    #[inline]
    pub fn acquire(&self) -> Buffer {
        match self.slots.as_ref().and_then(ArrayQueue::pop) {
            Some(buf) => {
                self.hits.fetch_add(1, RELAXED);
                buf
            }
            None => {
                self.misses.fetch_add(1, RELAXED);
                Buffer::with_capacity(self.alloc_size)
            }
        }
    }

    /// Return a buffer to the pool.
    ///
    /// The buffer is reset. If its backing storage grew beyond `alloc_size`
    /// it is dropped and replaced by a fresh buffer, so growth during use
    /// never stays in the pool. Smaller buffers are kept as they are. If the
    /// pool is full, the buffer is dropped.
    #[inline]
    pub fn release(&self, mut buf: Buffer) {
        buf.reset();

        // Measured from offset zero, not from the read cursor.
        if buf.full_capacity() > self.alloc_size {
            trace!(
                "Replacing oversized buffer: capacity {} > {}",
                buf.full_capacity(),
                self.alloc_size
            );
            self.replaced.fetch_add(1, RELAXED);
            buf = Buffer::with_capacity(self.alloc_size);
        }

        let accepted = match &self.slots {
            Some(queue) => queue.push(buf).is_ok(),
            None => false,
        };

        if accepted {
            self.returns.fetch_add(1, RELAXED);
        } else {
            trace!("Buffer pool full, dropping buffer");
            self.drops.fetch_add(1, RELAXED);
        }
    }

    /// Acquire a buffer wrapped in a guard that releases it on drop.
    pub fn lease(&self) -> PooledBuffer<'_> {
        PooledBuffer::new(self, self.acquire())
    }

    /// Remove and return every resident buffer.
    pub fn drain(&self) -> Vec<Buffer> {
        let mut drained = Vec::with_capacity(self.len());
        if let Some(queue) = &self.slots {
            while let Some(buf) = queue.pop() {
                drained.push(buf);
            }
        }
        drained
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            resident: self.len(),
            hits: self.hits.load(RELAXED),
            misses: self.misses.load(RELAXED),
            returns: self.returns.load(RELAXED),
            replaced: self.replaced.load(RELAXED),
            drops: self.drops.load(RELAXED),
        }
    }

    /// Get the current number of resident buffers.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.as_ref().map_or(0, ArrayQueue::len)
    }

    /// Check if no buffers are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident buffers.
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots.as_ref().map_or(0, ArrayQueue::capacity)
    }

    /// Capacity of buffers created by this pool.
    #[inline]
    pub fn alloc_size(&self) -> usize {
        self.alloc_size
    }
}

impl Default for LeakyBufferPool {
    fn default() -> Self {
        Self::from_config(&PoolConfig::default())
    }
}

impl std::fmt::Debug for LeakyBufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeakyBufferPool")
            .field("slots", &self.slots())
            .field("alloc_size", &self.alloc_size)
            .field("resident", &self.len())
            .finish()
    }
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Current buffers in pool.
    pub resident: usize,
    /// Buffers acquired from pool (cache hits).
    pub hits: usize,
    /// Buffers created new (cache misses).
    pub misses: usize,
    /// Buffers returned to pool.
    pub returns: usize,
    /// Buffers replaced on release because they outgrew `alloc_size`.
    pub replaced: usize,
    /// Buffers dropped when pool was full.
    pub drops: usize,
}

impl PoolStats {
    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
