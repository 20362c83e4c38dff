//! MD5 block digest.

use md5::{Digest as _, Md5};

use super::{BlockDigest, DigestFailure};
use crate::block::Digest;

/// Computes MD5 digests. Each call uses its own hasher state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl Md5Digest {
    /// Hashes data in one shot.
    pub fn hash(data: &[u8]) -> Digest {
        let bytes: [u8; 16] = Md5::digest(data).into();
        Digest::from(bytes)
    }
}

impl BlockDigest for Md5Digest {
    fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure> {
        Ok(Self::hash(data))
    }

    fn output_size(&self) -> usize {
        16
    }

    fn name(&self) -> &'static str {
        "md5"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            Md5Digest::hash(b"").to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            Md5Digest::hash(b"abc").to_hex(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            Md5Digest::hash(&[0x41, 0x41, 0x41, 0x41]).to_hex(),
            "098890dde069e9abad63f19a0d9e1f32"
        );
    }

    #[test]
    fn test_deterministic() {
        let hash = Md5Digest.digest(b"hello world").unwrap();
        let hash2 = Md5Digest.digest(b"hello world").unwrap();
        assert_eq!(hash, hash2);

        let hash3 = Md5Digest.digest(b"hello world!").unwrap();
        assert_ne!(hash, hash3);
    }
}
