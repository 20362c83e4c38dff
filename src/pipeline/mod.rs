//! Ordered parallel digest pipeline.
//!
//! - [`DigestPipeline`] - Reads blocks, hashes them on a worker pool, writes digests in order
//! - [`WorkerPool`] / [`TaskHandle`] - Submit one block, poll or wait for its digest
//! - [`RunSummary`] - Counters reported by a finished run

mod engine;
mod task;

pub use engine::{DigestPipeline, RunSummary};
pub use task::{TaskHandle, WorkerPool};
