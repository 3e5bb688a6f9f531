//! Bounded pooling of reusable byte buffers.
//!
//! This module provides a lock-free pool of scratch buffers for hot
//! byte-processing paths, reducing allocation overhead while keeping the
//! pool's memory footprint fixed.

mod buffer;
mod guard;
mod leaky;

pub use buffer::Buffer;
pub use guard::PooledBuffer;
pub use leaky::{LeakyBufferPool, PoolConfig, PoolStats, DEFAULT_ALLOC_SIZE, DEFAULT_SLOTS};
