//! SHA-256 block digest.

use sha2::{Digest as _, Sha256};

use super::{BlockDigest, DigestFailure};
use crate::block::Digest;

/// Computes SHA-256 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl Sha256Digest {
    /// Hashes data in one shot.
    pub fn hash(data: &[u8]) -> Digest {
        let bytes: [u8; 32] = Sha256::digest(data).into();
        Digest::from(bytes)
    }
}

impl BlockDigest for Sha256Digest {
    fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure> {
        Ok(Self::hash(data))
    }

    fn output_size(&self) -> usize {
        32
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}
