//! Digest primitives applied to individual blocks.
//!
//! Every implementation of [`BlockDigest`] builds a fresh hasher state per
//! call, so one instance can be shared by all workers of the pipeline.
//!
//! - [`Md5Digest`] - MD5, the default
//! - [`Sha256Digest`] - SHA-256
//! - [`Blake3Digest`] - BLAKE3 (requires `hash-blake3` feature)
//! - [`Algorithm`] - Selects one of the above by name

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::block::Digest;
use crate::error::HashError;

#[cfg(feature = "hash-blake3")]
mod blake3;
mod md5;
mod sha256;

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3Digest;
pub use self::md5::Md5Digest;
pub use self::sha256::Sha256Digest;

/// Error type returned by [`BlockDigest`] implementations.
pub type DigestFailure = Box<dyn std::error::Error + Send + Sync>;

/// A digest function over one block of bytes.
///
/// Implementations must be pure: the same bytes always yield the same digest,
/// and concurrent calls must not share mutable state.
pub trait BlockDigest: Send + Sync {
    /// Computes the digest of `data`.
    fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure>;

    /// Length of the produced digest in bytes.
    fn output_size(&self) -> usize;

    /// Short name used in log output.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Built-in digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// MD5 (16-byte digest).
    #[default]
    Md5,
    /// SHA-256 (32-byte digest).
    Sha256,
    /// BLAKE3 (32-byte digest).
    #[cfg(feature = "hash-blake3")]
    Blake3,
}

impl Algorithm {
    /// Returns the digest length in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha256 => 32,
            #[cfg(feature = "hash-blake3")]
            Algorithm::Blake3 => 32,
        }
    }

    /// Returns the canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
            #[cfg(feature = "hash-blake3")]
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Creates a shareable digest primitive for this algorithm.
    pub fn digester(&self) -> Arc<dyn BlockDigest> {
        match self {
            Algorithm::Md5 => Arc::new(Md5Digest),
            Algorithm::Sha256 => Arc::new(Sha256Digest),
            #[cfg(feature = "hash-blake3")]
            Algorithm::Blake3 => Arc::new(Blake3Digest),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            #[cfg(feature = "hash-blake3")]
            "blake3" => Ok(Algorithm::Blake3),
            _ => Err(HashError::InvalidConfig {
                message: "unknown digest algorithm",
            }),
        }
    }
}
