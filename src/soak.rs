//! Concurrent soak driver for a [`LeakyBufferPool`].
//!
//! Worker threads repeatedly lease a buffer, fill it with a marker unique to
//! the worker and cycle, verify the marker survived, and release it. Write
//! sizes periodically exceed the pool's allocation size so the leaky
//! normalization path runs under contention. A registry of live backing
//! allocations catches any buffer handed to two owners at once.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pool::{LeakyBufferPool, PoolStats};

/// Soak run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoakConfig {
    /// Number of worker threads
    pub threads: usize,
    /// Lease/release cycles per worker
    pub cycles: usize,
    /// Largest write per cycle, in bytes
    pub max_write: usize,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            cycles: 10_000,
            max_write: 16 * 1024,
        }
    }
}

impl SoakConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidArgument("threads must be > 0".to_string()));
        }
        if self.max_write == 0 {
            return Err(Error::InvalidArgument("max_write must be > 0".to_string()));
        }
        self.total_cycles()?;
        Ok(())
    }

    /// Total cycles across all workers
    pub fn total_cycles(&self) -> Result<usize> {
        self.threads.checked_mul(self.cycles).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{} threads x {} cycles overflows",
                self.threads, self.cycles
            ))
        })
    }
}

/// Outcome of a successful soak run.
#[derive(Debug, Clone)]
pub struct SoakReport {
    /// Total lease/release cycles completed
    pub cycles: usize,
    /// Largest resident count observed by any worker
    pub peak_resident: usize,
    /// Pool statistics at the end of the run
    pub stats: PoolStats,
    /// Wall-clock duration
    pub elapsed: Duration,
}

impl SoakReport {
    /// Cycles per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.cycles as f64 / secs
        }
    }
}

/// State shared by all workers of one run.
struct Shared<'a> {
    pool: &'a LeakyBufferPool,
    config: SoakConfig,
    /// Backing allocations currently held by a worker.
    live: Mutex<HashSet<usize>>,
    violations: AtomicUsize,
    peak_resident: AtomicUsize,
}

impl Shared<'_> {
    fn run_worker(&self, worker: usize) {
        for cycle in 0..self.config.cycles {
            let len = write_len(worker, cycle, self.config.max_write);
            let marker = marker(worker, cycle);

            let mut buf = self.pool.lease();
            buf.extend_from_slice(&vec![marker; len]);

            let addr = buf.storage_addr();
            if !self.live.lock().insert(addr) {
                warn!("Worker {} leased storage {:#x} already in use", worker, addr);
                self.violations.fetch_add(1, Ordering::Relaxed);
            }

            thread::yield_now();

            if buf.len() != len || buf.as_slice().iter().any(|&b| b != marker) {
                warn!("Worker {} found foreign bytes in cycle {}", worker, cycle);
                self.violations.fetch_add(1, Ordering::Relaxed);
            }

            self.live.lock().remove(&addr);
            drop(buf);

            self.peak_resident
                .fetch_max(self.pool.len(), Ordering::Relaxed);
        }
    }
}

/// Hammer `pool` from `config.threads` threads and verify its invariants.
///
/// Fails if any buffer was observed with two owners or if the pool ever
/// held more buffers than it has slots.
pub fn run(pool: &LeakyBufferPool, config: &SoakConfig) -> Result<SoakReport> {
    config.validate()?;
    let total_cycles = config.total_cycles()?;

    info!(
        "Soak: {} threads x {} cycles, writes up to {} bytes",
        config.threads, config.cycles, config.max_write
    );

    let shared = Shared {
        pool,
        config: *config,
        live: Mutex::new(HashSet::new()),
        violations: AtomicUsize::new(0),
        peak_resident: AtomicUsize::new(0),
    };

    let start = Instant::now();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|worker| {
                let shared = &shared;
                scope.spawn(move || shared.run_worker(worker))
            })
            .collect();

        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker);
            }
        }
        panicked.map_or(Ok(()), |worker| Err(Error::WorkerPanicked(worker)))
    })?;
    let elapsed = start.elapsed();

    let violations = shared.violations.load(Ordering::Relaxed);
    if violations > 0 {
        return Err(Error::OwnershipViolation(violations));
    }

    let peak_resident = shared.peak_resident.load(Ordering::Relaxed);
    let resident = peak_resident.max(pool.len());
    if resident > pool.slots() {
        return Err(Error::CapacityExceeded {
            resident,
            slots: pool.slots(),
        });
    }

    Ok(SoakReport {
        cycles: total_cycles,
        peak_resident,
        stats: pool.stats(),
        elapsed,
    })
}

/// Deterministic write size in `1..=max_write`.
fn write_len(worker: usize, cycle: usize, max_write: usize) -> usize {
    1 + (cycle.wrapping_mul(131) ^ worker.wrapping_mul(17)) % max_write
}

/// Fill byte unique enough to tell neighbouring owners apart.
fn marker(worker: usize, cycle: usize) -> u8 {
    (worker.wrapping_mul(31) ^ cycle) as u8 | 1
}
