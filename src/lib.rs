//! blockhash
//!
//! Ordered, parallel, fixed-size block digests for large files.
//!
//! `blockhash` splits a byte stream into blocks of a fixed size, computes a
//! digest of every block on a worker pool, and writes the digests strictly
//! in block order, one lowercase hex string per line. It is designed for:
//!
//! - incremental integrity checks of large files
//! - locating changed regions between two copies
//! - feeding block-level fingerprints to other tools
//!
//! The crate intentionally:
//! - does NOT hash multiple files per run
//! - does NOT verify against a manifest
//! - does NOT resume partial runs
//!
//! It only does one thing: **Read bytes → write ordered block digests**
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{self, BufWriter};
//! use blockhash::{BlockConfig, DigestPipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = File::open("data.bin")?;
//!     let pipeline = DigestPipeline::new(BlockConfig::from_mib(1)?)?;
//!
//!     let summary = pipeline.run(file, BufWriter::new(io::stdout().lock()))?;
//!     eprintln!("{} blocks", summary.blocks);
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
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
//!         println!("block {} ({} bytes)", block.index, block.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod chunker;
mod config;
mod error;
mod hash;
mod pipeline;

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use block::{Block, Digest};
pub use chunker::BlockReader;
pub use config::{BlockConfig, DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_SIZE_MIB, DrainPolicy, MIB};
pub use error::HashError;
#[cfg(feature = "hash-blake3")]
pub use hash::Blake3Digest;
pub use hash::{Algorithm, BlockDigest, DigestFailure, Md5Digest, Sha256Digest};
pub use pipeline::{DigestPipeline, RunSummary, TaskHandle, WorkerPool};

#[cfg(feature = "async-io")]
pub use async_stream::{BlockStream, blocks_async};
