//! BLAKE3 block digest.

use super::{BlockDigest, DigestFailure};
use crate::block::Digest;

/// Computes BLAKE3 digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Digest;

impl Blake3Digest {
    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> Digest {
        let bytes: [u8; 32] = blake3::hash(data).into();
        Digest::from(bytes)
    }
}

impl BlockDigest for Blake3Digest {
    fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure> {
        Ok(Self::hash(data))
    }

    fn output_size(&self) -> usize {
        32
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}
