//! Async stream adapter for block reading.
//!
//! This module provides asynchronous block partitioning using the
//! `futures-io::AsyncRead` trait, making it runtime-agnostic and compatible
//! with tokio, async-std, smol, and other async runtimes.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use blockhash::{blocks_async, BlockConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), blockhash::HashError> {
//!     let mut stream = blocks_async(reader, &BlockConfig::default());
//!
//!     while let Some(block) = stream.next().await {
//!         let block = block?;
//!         println!("block {}: {} bytes", block.index, block.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::BytesMut;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::block::Block;
use crate::config::BlockConfig;
use crate::error::HashError;

pin_project! {
    /// A stream that yields fixed-size blocks from an async reader.
    ///
    /// Blocks are filled exactly like [`BlockReader`](crate::BlockReader)
    /// fills them: up to `block_size` bytes, a short final block, nothing for
    /// an empty tail, and a single [`HashError::Read`] on failure.
    pub struct BlockStream<R> {
        #[pin]
        reader: R,
        block_size: usize,
        buffer: BytesMut,
        filled: usize,
        next_index: u64,
        position: u64,
        finished: bool,
    }
}

impl<R> BlockStream<R> {
    /// Creates a new block stream from an async reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - An async reader implementing `AsyncRead`
    /// * `config` - The block configuration
    pub fn new(reader: R, config: &BlockConfig) -> Self {
        let block_size = config.block_size();
        Self {
            reader,
            block_size,
            buffer: BytesMut::new(),
            filled: 0,
            next_index: 0,
            position: 0,
            finished: block_size == 0,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: AsyncRead> Stream for BlockStream<R> {
    type Item = Result<Block, HashError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        if this.buffer.is_empty() {
            *this.buffer = BytesMut::zeroed(*this.block_size);
            *this.filled = 0;
        }

        while *this.filled < *this.block_size {
            let buf = &mut this.buffer[*this.filled..];
            match this.reader.as_mut().poll_read(cx, buf) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(0)) => {
                    *this.finished = true;
                    break;
                }
                Poll::Ready(Ok(n)) => *this.filled += n,
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    this.buffer.clear();
                    return Poll::Ready(Some(Err(HashError::Read {
                        index: *this.next_index,
                        offset: *this.position,
                        source: e,
                    })));
                }
            }
        }

        let filled = std::mem::take(this.filled);
        if filled == 0 {
            return Poll::Ready(None);
        }

        let mut data = std::mem::take(this.buffer);
        data.truncate(filled);
        let block = Block::new(*this.next_index, data.freeze());

        *this.next_index += 1;
        *this.position += filled as u64;

        Poll::Ready(Some(Ok(block)))
    }
}

/// Creates a block stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use blockhash::{blocks_async, BlockConfig};
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let stream = blocks_async(tokio_reader.compat(), &BlockConfig::default());
/// ```
pub fn blocks_async<R: AsyncRead>(reader: R, config: &BlockConfig) -> BlockStream<R> {
    BlockStream::new(reader, config)
}
