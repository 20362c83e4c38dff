//! The Block type - one fixed-size slice of the input stream.

use bytes::Bytes;
use std::fmt;

/// A block of input with its position in the stream.
///
/// Every block produced by the readers in this crate holds exactly
/// `block_size` bytes, except possibly the last one.
///
/// # Example
///
/// ```
/// use blockhash::Block;
/// use bytes::Bytes;
///
/// let block = Block::new(2, Bytes::from_static(b"hello world"));
///
/// assert_eq!(block.index, 2);
/// assert_eq!(block.data.len(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 0-based position of the block in the stream.
    pub index: u64,

    /// The block's bytes.
    pub data: Bytes,
}

impl Block {
    /// Creates a block.
    pub fn new(index: u64, data: impl Into<Bytes>) -> Self {
        Self {
            index,
            data: data.into(),
        }
    }

    /// Returns the length of the block data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the block has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the byte offset of this block given the stream's block size.
    pub fn offset(&self, block_size: usize) -> u64 {
        self.index * block_size as u64
    }

    /// Returns the block as a byte range given the stream's block size.
    pub fn range(&self, block_size: usize) -> std::ops::Range<u64> {
        let start = self.offset(block_size);
        start..start + self.data.len() as u64
    }

    /// Consumes the block and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block(#{}, {} bytes)", self.index, self.len())
    }
}
