//! Error types for blockhash.

use thiserror::Error;

/// Errors that can occur while reading blocks or computing their digests.
#[derive(Debug, Error)]
pub enum HashError {
    /// Reading the input failed before end of stream was reached.
    ///
    /// No digest is produced for the block that was being filled.
    #[error("read error in block {index} at offset {offset}: {source}")]
    Read {
        /// Index of the block being filled when the read failed.
        index: u64,
        /// Stream offset at which the block started.
        offset: u64,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a digest line to the output sink failed.
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// The digest computation for a block failed.
    #[error("digest of block {index} failed: {message}")]
    Digest {
        /// Index of the block whose digest failed.
        index: u64,
        /// Description of the failure.
        message: String,
    },

    /// The worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl HashError {
    /// Returns the block index this error is attached to, if any.
    pub fn block_index(&self) -> Option<u64> {
        match self {
            HashError::Read { index, .. } | HashError::Digest { index, .. } => Some(*index),
            _ => None,
        }
    }
}
