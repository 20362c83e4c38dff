//! Block types.
//!
//! - [`Block`] - Fixed-size slice of the input tagged with its index
//! - [`Digest`] - Fixed-length digest of one block

mod data;
mod digest;

pub use data::Block;
pub use digest::Digest;
