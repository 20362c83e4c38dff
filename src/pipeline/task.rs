//! Worker pool and per-block task handles.
//!
//! A submitted block is moved into a job on the pool. The job sends its
//! result over a channel of capacity one, owned by the [`TaskHandle`]
//! returned to the controller. The handle can be polled without blocking or
//! waited on.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::block::{Block, Digest};
use crate::error::HashError;
use crate::hash::BlockDigest;

/// A fixed-size pool of digest workers.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Creates a pool with `workers` threads, or one per CPU when `workers` is 0.
    pub fn new(workers: usize) -> Result<Self, HashError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("blockhash-worker-{i}"))
            .build()
            .map_err(|e| HashError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Submits the digest of `block` and returns a handle to its result.
    ///
    /// The block is owned by the job until the digest is computed. A failing
    /// or panicking digest, or one whose length differs from
    /// [`BlockDigest::output_size`], resolves the handle to
    /// [`HashError::Digest`].
    pub fn submit(&self, block: Block, digester: Arc<dyn BlockDigest>) -> TaskHandle {
        let (tx, rx) = mpsc::sync_channel(1);
        let index = block.index;

        self.pool.spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| digester.digest(&block.data)));
            let result = match outcome {
                Ok(Ok(digest)) if digest.len() == digester.output_size() => Ok(digest),
                Ok(Ok(digest)) => Err(HashError::Digest {
                    index,
                    message: format!(
                        "digest is {} bytes, expected {}",
                        digest.len(),
                        digester.output_size()
                    ),
                }),
                Ok(Err(e)) => Err(HashError::Digest {
                    index,
                    message: e.to_string(),
                }),
                Err(payload) => Err(HashError::Digest {
                    index,
                    message: panic_message(payload.as_ref()),
                }),
            };
            // Receiver is gone if the run already aborted.
            let _ = tx.send(result);
        });

        TaskHandle {
            index,
            rx,
            result: None,
        }
    }
}

/// Handle to one in-flight block digest.
#[derive(Debug)]
pub struct TaskHandle {
    index: u64,
    rx: Receiver<Result<Digest, HashError>>,
    result: Option<Result<Digest, HashError>>,
}

impl TaskHandle {
    /// Index of the block this task is hashing.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns true once the result is available. Never blocks.
    pub fn is_ready(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.result = Some(Err(self.worker_lost()));
                true
            }
        }
    }

    /// Blocks until the digest is available and returns it.
    pub fn wait(mut self) -> Result<Digest, HashError> {
        if let Some(result) = self.result.take() {
            return result;
        }
        match self.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(self.worker_lost()),
        }
    }

    fn worker_lost(&self) -> HashError {
        HashError::Digest {
            index: self.index,
            message: "worker exited without a result".to_string(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("digest panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("digest panicked: {s}")
    } else {
        "digest panicked".to_string()
    }
}
