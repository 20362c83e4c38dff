//! The digest pipeline - reads blocks, hashes them in parallel, writes in order.
//!
//! The controller runs on the calling thread. It pulls a block, submits it
//! to the [`WorkerPool`], and pushes the [`TaskHandle`] onto a FIFO. After
//! every submission it writes whatever finished digests sit at the head of
//! the FIFO without blocking. Once the input is exhausted it waits on the
//! remaining handles in order.
//!
//! Output order is fixed by the FIFO alone: a block that finishes early
//! waits behind every block submitted before it.
//!
//! # Example
//!
//! ```
//! use blockhash::{BlockConfig, DigestPipeline};
//! use std::io::Cursor;
//!
//! let pipeline = DigestPipeline::new(BlockConfig::new(2)?)?;
//! let mut out = Vec::new();
//! let summary = pipeline.run(Cursor::new(&b"AAAAAA"[..]), &mut out)?;
//!
//! assert_eq!(summary.blocks, 3);
//! assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
//! # Ok::<(), blockhash::HashError>(())
//! ```

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::Arc;

use tracing::{debug, info, trace};

use super::task::{TaskHandle, WorkerPool};
use crate::block::Digest;
use crate::chunker::BlockReader;
use crate::config::{BlockConfig, DrainPolicy};
use crate::error::HashError;
use crate::hash::BlockDigest;

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of blocks hashed (equals the number of digests written).
    pub blocks: u64,
    /// Number of input bytes hashed.
    pub bytes: u64,
    /// Largest number of submitted but unwritten blocks seen at once.
    pub peak_pending: usize,
    /// Digests written by the non-blocking drain before end of input.
    pub drained_early: u64,
}

/// Hashes a stream block by block and emits the digests in block order.
///
/// A pipeline owns its worker pool and can be reused for several runs.
pub struct DigestPipeline {
    config: BlockConfig,
    digester: Arc<dyn BlockDigest>,
    pool: WorkerPool,
}

impl DigestPipeline {
    /// Creates a pipeline using the algorithm selected in `config`.
    pub fn new(config: BlockConfig) -> Result<Self, HashError> {
        Self::with_digest(config, config.algorithm().digester())
    }

    /// Creates a pipeline with a caller-provided digest primitive.
    ///
    /// The algorithm in `config` is ignored.
    pub fn with_digest(
        config: BlockConfig,
        digester: Arc<dyn BlockDigest>,
    ) -> Result<Self, HashError> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers())?;
        debug!(
            workers = pool.workers(),
            block_size = config.block_size(),
            digest = digester.name(),
            "pipeline ready"
        );
        Ok(Self {
            config,
            digester,
            pool,
        })
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// Hashes `reader` and writes one lowercase hex digest per line to `sink`.
    ///
    /// On a digest or write failure the run stops and no further lines are
    /// written. On a read failure the digests of all earlier blocks are
    /// written first, then [`HashError::Read`] is returned.
    pub fn run<R: Read, W: Write>(&self, reader: R, mut sink: W) -> Result<RunSummary, HashError> {
        let summary = self.drive(reader, |digest| {
            writeln!(sink, "{digest}").map_err(HashError::Write)
        })?;
        sink.flush().map_err(HashError::Write)?;
        Ok(summary)
    }

    /// Hashes `reader` and returns the digests in block order.
    pub fn digest_all<R: Read>(&self, reader: R) -> Result<Vec<Digest>, HashError> {
        let mut digests = Vec::new();
        self.drive(reader, |digest| {
            digests.push(digest);
            Ok(())
        })?;
        Ok(digests)
    }

    fn drive<R, F>(&self, reader: R, mut emit: F) -> Result<RunSummary, HashError>
    where
        R: Read,
        F: FnMut(Digest) -> Result<(), HashError>,
    {
        let mut blocks = BlockReader::new(reader, &self.config);
        let mut queue: VecDeque<TaskHandle> = VecDeque::new();
        let mut summary = RunSummary::default();

        loop {
            let block = match blocks.next_block() {
                Ok(Some(block)) => block,
                Ok(None) => break,
                Err(e) => {
                    // Earlier blocks are complete; emit them before surfacing the failure.
                    debug!(pending = queue.len(), "read failed, draining earlier blocks");
                    drain_blocking(&mut queue, &mut emit, 0)?;
                    return Err(e);
                }
            };

            if let Some(limit) = self.config.max_in_flight() {
                drain_blocking(&mut queue, &mut emit, limit - 1)?;
            }

            summary.blocks += 1;
            summary.bytes += block.len() as u64;
            debug!(index = block.index, len = block.len(), "submit");

            queue.push_back(self.pool.submit(block, Arc::clone(&self.digester)));
            summary.peak_pending = summary.peak_pending.max(queue.len());

            summary.drained_early += drain_ready(&mut queue, &mut emit, self.config.drain())?;
        }

        drain_blocking(&mut queue, &mut emit, 0)?;

        info!(
            blocks = summary.blocks,
            bytes = summary.bytes,
            peak_pending = summary.peak_pending,
            drained_early = summary.drained_early,
            "run complete"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for DigestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestPipeline")
            .field("config", &self.config)
            .field("digest", &self.digester.name())
            .field("workers", &self.pool.workers())
            .finish()
    }
}

/// Writes finished digests at the head of the queue without blocking.
///
/// Returns the number of digests written.
fn drain_ready<F>(
    queue: &mut VecDeque<TaskHandle>,
    emit: &mut F,
    policy: DrainPolicy,
) -> Result<u64, HashError>
where
    F: FnMut(Digest) -> Result<(), HashError>,
{
    let mut written = 0;
    while let Some(head) = queue.front_mut() {
        if !head.is_ready() {
            break;
        }
        if let Some(task) = queue.pop_front() {
            let index = task.index();
            emit(task.wait()?)?;
            trace!(index, "emitted");
            written += 1;
        }
        if policy == DrainPolicy::Single {
            break;
        }
    }
    Ok(written)
}

/// Waits on the head of the queue until at most `keep` tasks remain.
fn drain_blocking<F>(
    queue: &mut VecDeque<TaskHandle>,
    emit: &mut F,
    keep: usize,
) -> Result<(), HashError>
where
    F: FnMut(Digest) -> Result<(), HashError>,
{
    while queue.len() > keep {
        let Some(task) = queue.pop_front() else {
            break;
        };
        let index = task.index();
        emit(task.wait()?)?;
        trace!(index, "emitted");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{DigestFailure, Md5Digest};
    use std::io::{self, Cursor};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    struct FailOn(u8);

    impl BlockDigest for FailOn {
        fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure> {
            if data.first() == Some(&self.0) {
                return Err("refusing block".into());
            }
            Ok(Md5Digest::hash(data))
        }

        fn output_size(&self) -> usize {
            16
        }
    }

    /// Holds any block starting with 0 until released and counts finished digests.
    struct HeldFirst {
        release: Arc<AtomicBool>,
        finished: Arc<AtomicUsize>,
    }

    impl BlockDigest for HeldFirst {
        fn digest(&self, data: &[u8]) -> Result<Digest, DigestFailure> {
            if data.first() == Some(&0) {
                while !self.release.load(Ordering::Acquire) {
                    thread::yield_now();
                }
            }
            let digest = Md5Digest::hash(data);
            self.finished.fetch_add(1, Ordering::AcqRel);
            Ok(digest)
        }

        fn output_size(&self) -> usize {
            16
        }
    }

    /// Releases block 0 when the controller starts reading at `release_at`,
    /// then waits until `wait_for` digests have finished.
    struct Staged {
        inner: Cursor<Vec<u8>>,
        release_at: u64,
        wait_for: usize,
        release: Arc<AtomicBool>,
        finished: Arc<AtomicUsize>,
    }

    impl io::Read for Staged {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inner.position() == self.release_at && !self.release.swap(true, Ordering::AcqRel)
            {
                while self.finished.load(Ordering::Acquire) < self.wait_for {
                    thread::yield_now();
                }
                // Results are sent right after the counter moves
                thread::sleep(Duration::from_millis(50));
            }
            self.inner.read(buf)
        }
    }

    fn staged_run(drain: DrainPolicy) -> (Vec<Digest>, RunSummary) {
        // Block 0 is all zeros, blocks 1..=4 start with non-zero bytes
        let mut data = vec![0u8; 4];
        data.extend(1..=16u8);

        let release = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicUsize::new(0));
        let digester = Arc::new(HeldFirst {
            release: Arc::clone(&release),
            finished: Arc::clone(&finished),
        });
        let source = Staged {
            inner: Cursor::new(data),
            release_at: 16,
            wait_for: 4,
            release,
            finished,
        };

        let config = BlockConfig::new(4)
            .unwrap()
            .with_workers(4)
            .with_drain(drain);
        let pipeline = DigestPipeline::with_digest(config, digester).unwrap();

        let mut digests = Vec::new();
        let summary = pipeline
            .drive(source, |digest| {
                digests.push(digest);
                Ok(())
            })
            .unwrap();
        (digests, summary)
    }

    #[test]
    fn test_greedy_drain_writes_ready_run_early() {
        let (digests, summary) = staged_run(DrainPolicy::Greedy);

        assert_eq!(summary.blocks, 5);
        assert_eq!(digests.len(), 5);
        assert_eq!(digests[0], Md5Digest::hash(&[0u8; 4]));
        // Blocks 0..=3 were all finished when block 4 was submitted
        assert!(summary.drained_early >= 4, "drained {}", summary.drained_early);
    }

    #[test]
    fn test_single_drain_writes_one_per_submission() {
        let (digests, summary) = staged_run(DrainPolicy::Single);

        assert_eq!(digests.len(), 5);
        // Block 0 held the head until the last submission, which drains one
        assert_eq!(summary.drained_early, 1);
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_single_block() {
        let pipeline = DigestPipeline::new(BlockConfig::default().with_workers(2)).unwrap();
        let mut out = Vec::new();
        let summary = pipeline.run(Cursor::new(&b"AAAA"[..]), &mut out).unwrap();

        assert_eq!(summary.blocks, 1);
        assert_eq!(summary.bytes, 4);
        assert_eq!(out, b"098890dde069e9abad63f19a0d9e1f32\n");
    }

    #[test]
    fn test_empty_input() {
        let pipeline = DigestPipeline::new(BlockConfig::new(8).unwrap()).unwrap();
        let mut out = Vec::new();
        let summary = pipeline.run(Cursor::new(Vec::new()), &mut out).unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_digest_all_matches_run() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        let pipeline = DigestPipeline::new(BlockConfig::new(64).unwrap().with_workers(4)).unwrap();

        let digests = pipeline.digest_all(Cursor::new(&data)).unwrap();
        let mut out = Vec::new();
        pipeline.run(Cursor::new(&data), &mut out).unwrap();

        let expected: Vec<String> = digests.iter().map(Digest::to_hex).collect();
        assert_eq!(lines(&out), expected);
        assert_eq!(digests.len(), 16);
    }

    #[test]
    fn test_digest_failure_aborts() {
        let config = BlockConfig::new(2).unwrap().with_workers(2);
        let pipeline = DigestPipeline::with_digest(config, Arc::new(FailOn(b'c'))).unwrap();

        let mut out = Vec::new();
        let err = pipeline
            .run(Cursor::new(&b"aabbccdd"[..]), &mut out)
            .unwrap_err();

        assert!(matches!(err, HashError::Digest { index: 2, .. }));
        // Only blocks before the failing one may have been written
        let written = lines(&out);
        assert!(written.len() <= 2);
        for (i, line) in written.iter().enumerate() {
            let block = &b"aabbccdd"[i * 2..i * 2 + 2];
            assert_eq!(line, &Md5Digest::hash(block).to_hex());
        }
    }

    #[test]
    fn test_max_in_flight_caps_pending() {
        let config = BlockConfig::new(1)
            .unwrap()
            .with_workers(2)
            .with_max_in_flight(Some(3));
        let pipeline = DigestPipeline::new(config).unwrap();
        let summary = pipeline
            .run(Cursor::new(vec![7u8; 200]), std::io::sink())
            .unwrap();

        assert_eq!(summary.blocks, 200);
        assert!(summary.peak_pending <= 3);
    }

    #[test]
    fn test_single_drain_policy_same_output() {
        let data: Vec<u8> = (0..300).map(|i| (i * 7 + 13) as u8).collect();
        let greedy = DigestPipeline::new(BlockConfig::new(10).unwrap().with_workers(3)).unwrap();
        let single = DigestPipeline::new(
            BlockConfig::new(10)
                .unwrap()
                .with_workers(3)
                .with_drain(DrainPolicy::Single),
        )
        .unwrap();

        let a = greedy.digest_all(Cursor::new(&data)).unwrap();
        let b = single.digest_all(Cursor::new(&data)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BlockConfig::default().with_max_in_flight(Some(0));
        assert!(DigestPipeline::new(config).is_err());
    }
}
