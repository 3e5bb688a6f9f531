pub mod config;
pub mod error;
pub mod pool;
pub mod soak;

pub use config::Config;
pub use error::{Error, Result};
pub use pool::{Buffer, LeakyBufferPool, PoolConfig, PoolStats, PooledBuffer};
