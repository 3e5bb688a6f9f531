use clap::Parser;

use crate::pool::{PoolConfig, DEFAULT_ALLOC_SIZE, DEFAULT_SLOTS};
use crate::soak::SoakConfig;

/// leaky-buffer - Soak test a bounded leaky buffer pool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Maximum number of resident buffers in the pool
    #[arg(short, long, default_value_t = DEFAULT_SLOTS)]
    pub slots: usize,

    /// Capacity in bytes of every pooled buffer
    #[arg(short, long, default_value_t = DEFAULT_ALLOC_SIZE)]
    pub alloc_size: usize,

    // === Soak settings ===

    /// Number of worker threads
    #[arg(short, long, default_value = "8")]
    pub threads: usize,

    /// Lease/release cycles per worker
    #[arg(short, long, default_value = "10000")]
    pub cycles: usize,

    /// Largest write per cycle in bytes (values above alloc-size exercise replacement)
    #[arg(long, default_value = "16384")]
    pub max_write: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse_args() -> Self {
        Config::parse()
    }

    /// Get the pool configuration
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            slots: self.slots,
            alloc_size: self.alloc_size,
        }
    }

    /// Get the soak configuration
    pub fn soak_config(&self) -> SoakConfig {
        SoakConfig {
            threads: self.threads,
            cycles: self.cycles,
            max_write: self.max_write,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let soak = SoakConfig::default();
        Self {
            slots: DEFAULT_SLOTS,
            alloc_size: DEFAULT_ALLOC_SIZE,
            threads: soak.threads,
            cycles: soak.cycles,
            max_write: soak.max_write,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "leaky-buffer",
            "--slots",
            "4",
            "--alloc-size",
            "1024",
            "-t",
            "2",
            "--max-write",
            "3072",
        ])
        .unwrap();

        assert_eq!(
            config.pool_config(),
            PoolConfig {
                slots: 4,
                alloc_size: 1024
            }
        );
        assert_eq!(config.soak_config().threads, 2);
        assert_eq!(config.soak_config().cycles, 10_000);
        assert_eq!(config.soak_config().max_write, 3072);
    }

    #[test]
    fn test_defaults_match_clap() {
        let parsed = Config::try_parse_from(["leaky-buffer"]).unwrap();
        let default = Config::default();

        assert_eq!(parsed.pool_config(), default.pool_config());
        assert_eq!(parsed.soak_config(), default.soak_config());
        assert_eq!(parsed.log_level, default.log_level);
    }
}
