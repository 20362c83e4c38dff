//! Block reader for processing byte streams.
//!
//! - [`BlockReader`] - Sequential fixed-size partitioning of a `Read` source

mod engine;

// Re-export for use within the crate
pub use engine::BlockReader;
