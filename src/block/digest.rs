//! Block digest type.

use std::fmt;
use std::hash::{Hash as StdHash, Hasher};

/// A fixed-length digest of one block.
///
/// The length depends on the algorithm (16 bytes for MD5, 32 for SHA-256
/// and BLAKE3) and is at most [`Digest::MAX_SIZE`]. Its textual form is
/// lowercase hex.
#[derive(Clone, Copy)]
pub struct Digest {
    bytes: [u8; Digest::MAX_SIZE],
    len: u8,
}

impl Digest {
    /// Largest digest this type can hold, in bytes.
    pub const MAX_SIZE: usize = 64;

    /// Creates a digest from a slice.
    ///
    /// Returns `None` if the slice is empty or longer than [`Digest::MAX_SIZE`].
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.is_empty() || slice.len() > Self::MAX_SIZE {
            return None;
        }
        let mut bytes = [0u8; Self::MAX_SIZE];
        bytes[..slice.len()].copy_from_slice(slice);
        Some(Self {
            bytes,
            len: slice.len() as u8,
        })
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Returns the digest length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a digest holds at least one byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parses a digest from a hex string.
    ///
    /// Returns `None` if the string is not valid hex or has an unsupported length.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let bytes = hex::decode(hex_str).ok()?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; 16]> for Digest {
    fn from(bytes: [u8; 16]) -> Self {
        let mut out = [0u8; Self::MAX_SIZE];
        out[..16].copy_from_slice(&bytes);
        Self { bytes: out, len: 16 }
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        let mut out = [0u8; Self::MAX_SIZE];
        out[..32].copy_from_slice(&bytes);
        Self { bytes: out, len: 32 }
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Digest {}

impl StdHash for Digest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.as_bytes());
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_array() {
        let digest = Digest::from([0xABu8; 16]);
        assert_eq!(digest.len(), 16);
        assert_eq!(digest.as_bytes(), &[0xABu8; 16]);
    }

    #[test]
    fn test_from_slice() {
        let digest = Digest::from_slice(&[1u8; 20]).unwrap();
        assert_eq!(digest.len(), 20);

        // Wrong size
        assert!(Digest::from_slice(&[]).is_none());
        assert!(Digest::from_slice(&[0u8; 65]).is_none());
    }

    #[test]
    fn test_to_hex_is_lowercase() {
        let digest = Digest::from([0xABu8; 32]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_hex_round_trip() {
        let hex = "098890dde069e9abad63f19a0d9e1f32";
        let digest = Digest::from_hex(hex).unwrap();
        assert_eq!(digest.len(), 16);
        assert_eq!(digest.to_hex(), hex);
        assert!(Digest::from_hex("xyz").is_none());
    }

    #[test]
    fn test_display_matches_hex() {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        let digest = Digest::from(bytes);
        assert!(digest.to_string().starts_with("0123456789abcdef"));
        assert_eq!(digest.to_string(), digest.to_hex());
    }

    #[test]
    fn test_equality_ignores_padding() {
        let a = Digest::from_slice(&[7u8; 16]).unwrap();
        let b = Digest::from([7u8; 16]);
        assert_eq!(a, b);
        assert_ne!(a, Digest::from([7u8; 32]));
    }
}
