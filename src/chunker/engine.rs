//! Core block reader - splits a [`std::io::Read`] source into fixed-size blocks.
//!
//! - [`BlockReader`] - Pulls one block per call and tags it with its index
//! - `next_block()` - Fill up to `block_size` bytes, `Ok(None)` at end of stream
//!
//! # Example
//!
//! ```
//! use blockhash::{BlockConfig, BlockReader};
//! use std::io::Cursor;
//!
//! let config = BlockConfig::new(4)?;
//! let mut reader = BlockReader::new(Cursor::new(&b"abcdefghij"[..]), &config);
//!
//! let mut sizes = Vec::new();
//! while let Some(block) = reader.next_block()? {
//!     sizes.push(block.len());
//! }
//! assert_eq!(sizes, vec![4, 4, 2]);
//! # Ok::<(), blockhash::HashError>(())
//! ```

use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::block::Block;
use crate::config::BlockConfig;
use crate::error::HashError;

/// Reads a stream sequentially in fixed-size blocks.
///
/// Each block is filled until it holds `block_size` bytes or the reader
/// returns `Ok(0)`. A short, non-empty fill is the final block. A zero-length
/// tail produces no block. Reads never seek or look ahead, so a
/// `BlockReader` can only be restarted by reopening the source.
///
/// `Interrupted` errors are retried. Any other read error is reported as
/// [`HashError::Read`] and ends the sequence, so a failed stream is never
/// mistaken for a clean end of file.
#[derive(Debug)]
pub struct BlockReader<R> {
    reader: R,
    block_size: usize,
    next_index: u64,
    position: u64,
    finished: bool,
}

impl<R: Read> BlockReader<R> {
    /// Creates a block reader over `reader` using the configured block size.
    pub fn new(reader: R, config: &BlockConfig) -> Self {
        Self::with_block_size(reader, config.block_size())
    }

    /// Creates a block reader with an explicit block size in bytes.
    ///
    /// A block size of zero yields no blocks; use [`BlockConfig`] validation
    /// to reject it earlier.
    pub fn with_block_size(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            block_size,
            next_index: 0,
            position: 0,
            finished: block_size == 0,
        }
    }

    /// Reads the next block.
    ///
    /// Returns `Ok(None)` once the stream is exhausted, and on every call
    /// after that or after an error.
    pub fn next_block(&mut self) -> Result<Option<Block>, HashError> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = BytesMut::zeroed(self.block_size);
        let mut filled = 0;

        while filled < self.block_size {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(HashError::Read {
                        index: self.next_index,
                        offset: self.position,
                        source: e,
                    });
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        buf.truncate(filled);
        let block = Block::new(self.next_index, buf.freeze());

        self.next_index += 1;
        self.position += filled as u64;

        Ok(Some(block))
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the number of blocks produced so far.
    pub fn blocks_read(&self) -> u64 {
        self.next_index
    }

    /// Returns the block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Consumes the block reader and returns the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for BlockReader<R> {
    type Item = Result<Block, HashError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for BlockReader<R> {}
