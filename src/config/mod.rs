//! Configuration for block hashing.
//!
//! This module provides types to configure how a stream is split and hashed:
//!
//! - [`BlockConfig`] - Block size, digest algorithm and worker pool settings
//! - [`DrainPolicy`] - How eagerly finished digests are written between submissions
//!
//! # Example
//!
//! ```
//! use blockhash::{Algorithm, BlockConfig, DrainPolicy};
//!
//! // 4 MiB blocks
//! let config = BlockConfig::from_mib(4)?;
//!
//! // Builder pattern
//! let config = BlockConfig::default()
//!     .with_algorithm(Algorithm::Sha256)
//!     .with_workers(8)
//!     .with_drain(DrainPolicy::Single)
//!     .with_max_in_flight(Some(16));
//! config.validate()?;
//!
//! # Ok::<(), blockhash::HashError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::HashError;
use crate::hash::Algorithm;

/// Bytes in one mebibyte, the unit of the configured block size.
pub const MIB: usize = 1024 * 1024;

/// Default block size in mebibytes.
pub const DEFAULT_BLOCK_SIZE_MIB: usize = 1;

/// Default block size in bytes (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = DEFAULT_BLOCK_SIZE_MIB * MIB;

/// Controls the opportunistic, non-blocking drain performed after each submission.
///
/// Neither policy changes the output: digests are always written in block order.
/// They differ only in how many finished digests may sit in memory waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrainPolicy {
    /// Write every finished digest at the head of the queue.
    #[default]
    Greedy,
    /// Check the head of the queue once per submission.
    Single,
}

impl fmt::Display for DrainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainPolicy::Greedy => f.write_str("greedy"),
            DrainPolicy::Single => f.write_str("single"),
        }
    }
}

impl FromStr for DrainPolicy {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(DrainPolicy::Greedy),
            "single" => Ok(DrainPolicy::Single),
            _ => Err(HashError::InvalidConfig {
                message: "drain policy must be `greedy` or `single`",
            }),
        }
    }
}

/// Configuration for fixed-size block hashing.
///
/// `BlockConfig` controls how the input is partitioned and how the digests
/// are computed:
///
/// - Block size (`block_size`) - Every block but the last has exactly this many bytes
/// - Algorithm (`algorithm`) - Digest primitive applied to each block
/// - Workers (`workers`) - Size of the worker pool, `0` for one per CPU
/// - Drain policy (`drain`) - See [`DrainPolicy`]
/// - In-flight limit (`max_in_flight`) - Caps the number of pending blocks
///
/// # Example
///
/// ```
/// use blockhash::BlockConfig;
///
/// let config = BlockConfig::default();
/// assert_eq!(config.block_size(), 1024 * 1024);
///
/// let config = BlockConfig::new(64 * 1024)?;
/// assert_eq!(config.block_size(), 65536);
/// # Ok::<(), blockhash::HashError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockConfig {
    /// Block size in bytes.
    block_size: usize,

    /// Digest algorithm applied to every block.
    algorithm: Algorithm,

    /// Worker threads, `0` for the pool default.
    workers: usize,

    /// Opportunistic drain behavior.
    drain: DrainPolicy,

    /// Upper bound on submitted but unwritten blocks.
    max_in_flight: Option<usize>,
}

impl BlockConfig {
    /// Creates a configuration with the given block size in bytes.
    ///
    /// Returns error if the size is zero.
    pub fn new(block_size: usize) -> Result<Self, HashError> {
        if block_size == 0 {
            return Err(HashError::InvalidConfig {
                message: "block size must be non-zero",
            });
        }

        Ok(Self {
            block_size,
            ..Self::default()
        })
    }

    /// Creates a configuration with the block size given in mebibytes.
    ///
    /// Returns error if the count is zero or the byte size overflows `usize`.
    pub fn from_mib(mib: usize) -> Result<Self, HashError> {
        let bytes = mib.checked_mul(MIB).ok_or(HashError::InvalidConfig {
            message: "block size in MiB is too large",
        })?;
        Self::new(bytes)
    }

    /// Sets the block size in bytes.
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the number of worker threads (`0` = one per CPU).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the drain policy.
    pub fn with_drain(mut self, drain: DrainPolicy) -> Self {
        self.drain = drain;
        self
    }

    /// Sets the in-flight limit. `None` leaves the queue unbounded.
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit;
        self
    }

    /// Returns the block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the digest algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the drain policy.
    pub fn drain(&self) -> DrainPolicy {
        self.drain
    }

    /// Returns the in-flight limit.
    pub fn max_in_flight(&self) -> Option<usize> {
        self.max_in_flight
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), HashError> {
        if self.block_size == 0 {
            return Err(HashError::InvalidConfig {
                message: "block size must be non-zero",
            });
        }
        if self.max_in_flight == Some(0) {
            return Err(HashError::InvalidConfig {
                message: "in-flight limit must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            algorithm: Algorithm::default(),
            workers: 0,
            drain: DrainPolicy::default(),
            max_in_flight: None,
        }
    }
}
